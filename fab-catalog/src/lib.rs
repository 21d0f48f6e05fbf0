pub mod options;
pub mod pricing;
pub mod product;
pub mod repository;

pub use options::{ColorSlot, PrintTimes, ProductOptions};
pub use pricing::{PriceBreakdown, PriceRequest, PricingEngine};
pub use product::{
    Color, Complexity, ComplexityTier, CustomizationOption, Material, MaterialCategory, PrintSize,
    Product,
};
pub use repository::{CatalogRepository, MemoryCatalogRepository};
