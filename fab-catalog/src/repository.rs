use async_trait::async_trait;
use uuid::Uuid;

use fab_core::repository::RepoError;

use crate::product::{Material, Product};

/// Catalog store access. Records returned here have already passed boundary
/// validation, so `Product::options` is fully typed and color categories have
/// been resolved against the material list.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError>;

    async fn list_active_products(&self) -> Result<Vec<Product>, RepoError>;

    async fn list_materials(&self) -> Result<Vec<Material>, RepoError>;
}

/// In-memory catalog for tests and demos.
pub struct MemoryCatalogRepository {
    products: Vec<Product>,
    materials: Vec<Material>,
}

impl MemoryCatalogRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            materials: Vec::new(),
        }
    }

    pub fn with_materials(products: Vec<Product>, materials: Vec<Material>) -> Self {
        Self {
            products,
            materials,
        }
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalogRepository {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_active_products(&self) -> Result<Vec<Product>, RepoError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn list_materials(&self) -> Result<Vec<Material>, RepoError> {
        Ok(self.materials.clone())
    }
}
