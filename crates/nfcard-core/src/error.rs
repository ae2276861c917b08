use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid timestamps: updated_at ({updated_at}) is before created_at ({created_at})")]
    InvalidTimestamps { created_at: i64, updated_at: i64 },

    #[error("Unknown duplicate policy: {0}")]
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
