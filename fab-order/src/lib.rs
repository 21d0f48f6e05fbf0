pub mod assembler;
pub mod cart;
pub mod manager;
pub mod models;
pub mod repository;
pub mod schedule;
pub mod zones;

pub use assembler::{AssemblyFailure, AssemblyReport, CheckoutError, OrderAssembler};
pub use cart::{Cart, CartLine};
pub use manager::{OrderError, OrderManager};
pub use models::{Customer, Fulfillment, FulfillmentKind, Order, OrderStatus};
pub use repository::{MemoryOrderRepository, OrderRepository};
pub use schedule::{ReorderReport, ScheduleEntry, ScheduleQueue};
pub use zones::{FulfillmentChoice, PromoClaim};
