pub mod repository;
pub mod settings;

pub use repository::{RepoError, SettingsRepository};
pub use settings::{SettingValue, Settings};
