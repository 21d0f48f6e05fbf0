pub mod app_config;
pub mod catalog_repo;
pub mod database;
pub mod order_repo;
pub mod settings_repo;

pub use catalog_repo::StoreCatalogRepository;
pub use database::DbClient;
pub use order_repo::StoreOrderRepository;
pub use settings_repo::StoreSettingsRepository;
