use async_trait::async_trait;

use crate::settings::Settings;

/// Errors surfaced by the persistence gateway.
///
/// `MissingPriorityColumn` is kept distinct so the schedule reorder batch can
/// tell the operator to run the migration instead of reporting a generic
/// failure.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("The orders table has no print_priority column; apply the schedule migration")]
    MissingPriorityColumn,

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Settings store access: one flat key/value load per operation.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load_settings(&self) -> Result<Settings, RepoError>;
}
