use thiserror::Error;

/// Storage-specific error types for the card store.
///
/// These errors represent failures of the key-value backend, of the JSON
/// blob holding the card collection, and of record-level checks.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The stored blob could not be parsed, or a card could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entity not found in the collection
    #[error("Entity not found: {entity_type} with {field}={value}")]
    NotFound {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Data validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The key-value backend is unavailable
    #[error("Backend unavailable: {0}")]
    Backend(String),
}

impl StorageError {
    /// Not-found error for a card looked up by id.
    pub fn card_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "BusinessCard".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }
}

impl From<nfcard_core::Error> for StorageError {
    fn from(error: nfcard_core::Error) -> Self {
        Self::Validation(error.to_string())
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
