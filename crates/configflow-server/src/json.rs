//! JSON response types.
//!
//! Stored records are never serialized directly when they carry secrets:
//! administrators are returned without their secret hash, and API keys
//! expose their secret only in the create response.

use chrono::{DateTime, Utc};
use configflow_core::model::{Admin, ApiKey};
use configflow_core::{ActorType, IssuedToken, RecordId};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Whether the store answered.
    pub store: bool,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer",
            expires_at: issued.expires_at,
        }
    }
}

/// An administrator without its secret hash.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    /// Record id.
    pub id: RecordId,
    /// Login name.
    pub username: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

/// An API key without its secret.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    /// Record id.
    pub id: RecordId,
    /// Optional label.
    pub name: Option<String>,
    /// Kind of actor that created the key.
    pub creator_type: ActorType,
    /// Id of the creating actor.
    pub creator_id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            creator_type: key.creator_type,
            creator_id: key.creator_id,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}

/// A newly created API key, including its secret.
#[derive(Debug, Serialize)]
pub struct CreatedApiKeyResponse {
    /// Key metadata.
    #[serde(flatten)]
    pub key: ApiKeyResponse,
    /// Bearer secret. Not retrievable later.
    pub secret: String,
}

impl From<ApiKey> for CreatedApiKeyResponse {
    fn from(mut key: ApiKey) -> Self {
        let secret = std::mem::take(&mut key.secret);
        Self {
            key: key.into(),
            secret,
        }
    }
}
