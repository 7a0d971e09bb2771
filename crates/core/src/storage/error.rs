use thiserror::Error;

/// Errors raised while turning wire data into attributes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unsupported type tag '{tag}' for field '{field}'")]
    UnsupportedType { field: String, tag: &'static str },
    #[error("Invalid number for field '{field}': {value}")]
    InvalidNumber { field: String, value: String },
    #[error("Malformed response body: {0}")]
    Body(String),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Cannot encode field '{field}': {reason}")]
    Encode { field: String, reason: String },
    #[error("Store request failed: {message}")]
    StoreRequest { message: String },
    #[error("{entity_type} failed attribute validation")]
    Validation { entity_type: &'static str },
    #[error("{entity_type} is missing a value for key field '{field}'")]
    MissingKey {
        entity_type: &'static str,
        field: String,
    },
    #[error("Invalid rules for {entity_type}: {reason}")]
    InvalidRules {
        entity_type: &'static str,
        reason: String,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
