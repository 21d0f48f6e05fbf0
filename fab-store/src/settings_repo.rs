use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use fab_core::repository::{RepoError, SettingsRepository};
use fab_core::settings::{SettingValue, Settings};

pub struct StoreSettingsRepository {
    pool: PgPool,
}

impl StoreSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for StoreSettingsRepository {
    async fn load_settings(&self) -> Result<Settings, RepoError> {
        let rows = sqlx::query("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Backend(e.to_string()))?;

        let mut values = HashMap::new();
        for row in rows {
            let key: String = row
                .try_get("key")
                .map_err(|e| RepoError::Backend(e.to_string()))?;
            let raw: serde_json::Value = row
                .try_get("value")
                .map_err(|e| RepoError::Backend(e.to_string()))?;

            // Rows that do not decode into a known shape are skipped; the
            // typed getters then degrade to defaults for those keys.
            match serde_json::from_value::<SettingValue>(raw) {
                Ok(value) => {
                    values.insert(key, value);
                }
                Err(e) => {
                    tracing::warn!("Skipping undecodable setting '{}': {}", key, e);
                }
            }
        }

        Ok(Settings::new(values))
    }
}
