use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::storage::Document;

/// An administrator account.
///
/// `secret_hash` is an Argon2id PHC string; the plaintext secret is never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: RecordId,
    pub username: String,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(username: impl Into<String>, secret_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            username: username.into(),
            secret_hash: secret_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Admin {
    const COLLECTION: &'static str = "admins";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn unique_value(&self) -> Option<String> {
        Some(self.username.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
}

/// Fields left as `None` are not changed. Setting `password` rotates the
/// stored secret hash.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdminRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
