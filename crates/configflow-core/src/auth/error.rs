use thiserror::Error;

use crate::error::{self, ServiceError};

/// Session token errors.
///
/// These never reach callers: the authenticator logs them and answers
/// [`AuthError::Unauthorized`].
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature, structure, issuer or audience check failed.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// `now >= exp + leeway`.
    #[error("token expired")]
    Expired,

    /// Token could not be signed.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Password hashing errors.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Authentication outcome errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential missing, malformed, expired, mismatched or revoked.
    #[error("unauthorized")]
    Unauthorized,

    /// The credential store or token signer failed.
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl From<error::Error> for AuthError {
    fn from(err: error::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ServiceError::Unauthorized,
            AuthError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}
