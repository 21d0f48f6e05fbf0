use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use fab_catalog::options::ProductOptions;
use fab_catalog::product::{Color, Material, MaterialCategory, Product};
use fab_catalog::repository::CatalogRepository;
use fab_core::repository::RepoError;

const PRODUCT_COLUMNS: &str =
    "id, name, description, base_price_cents, is_active, colors, metadata, created_at";

const MATERIAL_COLUMNS: &str = "name, category, cost_per_gram, upcharge_cents, active";

pub struct StoreCatalogRepository {
    pool: PgPool,
}

impl StoreCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// This is the catalog boundary: loose `colors`/`metadata` JSON becomes
    /// typed fields exactly once, here. Color categories resolve against the
    /// material list so pricing never re-reads material rows.
    fn decode(row: &PgRow, materials: &[Material]) -> Result<Product, RepoError> {
        let raw_colors: serde_json::Value = try_column(row, "colors")?;
        let mut colors: Vec<Color> = serde_json::from_value(raw_colors).unwrap_or_else(|e| {
            tracing::warn!("Undecodable colors on product row, selling colorless: {}", e);
            Vec::new()
        });
        for color in &mut colors {
            color.category = color.resolve_category(materials);
        }

        let metadata: serde_json::Value = try_column(row, "metadata")?;

        Ok(Product {
            id: try_column(row, "id")?,
            name: try_column(row, "name")?,
            description: try_column(row, "description")?,
            base_price: try_column(row, "base_price_cents")?,
            is_active: try_column(row, "is_active")?,
            colors,
            options: ProductOptions::from_metadata(&metadata),
            created_at: try_column(row, "created_at")?,
        })
    }
}

fn try_column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| RepoError::Backend(format!("column {}: {}", name, e)))
}

fn decode_material(row: &PgRow) -> Result<Material, RepoError> {
    let raw_category: String = try_column(row, "category")?;
    Ok(Material {
        name: try_column(row, "name")?,
        category: MaterialCategory::parse(&raw_category).unwrap_or(MaterialCategory::Standard),
        cost_per_gram: try_column(row, "cost_per_gram")?,
        upcharge: try_column(row, "upcharge_cents")?,
        active: try_column(row, "active")?,
    })
}

#[async_trait]
impl CatalogRepository for StoreCatalogRepository {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError> {
        let materials = self.list_materials().await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Backend(e.to_string()))?;

        row.as_ref().map(|r| Self::decode(r, &materials)).transpose()
    }

    async fn list_active_products(&self) -> Result<Vec<Product>, RepoError> {
        let materials = self.list_materials().await?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM products WHERE is_active = TRUE ORDER BY created_at",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Backend(e.to_string()))?;

        rows.iter().map(|r| Self::decode(r, &materials)).collect()
    }

    async fn list_materials(&self) -> Result<Vec<Material>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM materials ORDER BY name",
            MATERIAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Backend(e.to_string()))?;

        rows.iter().map(decode_material).collect()
    }
}
