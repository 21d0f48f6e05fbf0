pub mod models;
pub mod money;

pub use money::Cents;
