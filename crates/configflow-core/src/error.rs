//! Core error types.

use thiserror::Error;

/// Document store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Document (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A unique index entry is owned by another document.
    #[error("unique constraint violated on {collection}: {value}")]
    UniqueViolation {
        /// Collection holding the index.
        collection: &'static str,
        /// Conflicting indexed value.
        value: String,
    },

    /// Document not found.
    #[error("record not found")]
    NotFound,

    /// Stored bytes are not in the expected format.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the resource services and the authenticator.
///
/// This is the taxonomy callers see; lower-level errors are collapsed into it
/// at the service boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Credential missing, malformed, expired, mismatched or revoked.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource identifier does not resolve.
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness violation on create or update.
    #[error("{0}")]
    Conflict(String),

    /// Malformed input, such as a non-hex identifier.
    #[error("validation error: {0}")]
    Validation(String),

    /// Store connectivity or unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::UniqueViolation { collection, value } => {
                ServiceError::Conflict(format!("{} {} already exists", singular(collection), value))
            }
            Error::NotFound => ServiceError::NotFound("record".to_string()),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

fn singular(collection: &str) -> &str {
    match collection {
        "environments" => "environment",
        "admins" => "admin",
        "api_keys" => "api key",
        other => other,
    }
}
