use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),

    #[error("invalid schema entry '{field}': {reason}")]
    InvalidSpec { field: String, reason: String },

    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
