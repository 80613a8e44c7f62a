use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::actor::{Actor, ActorType};
use crate::storage::Document;

/// Prefix of generated API key secrets.
///
/// Secrets never contain `.`, so they can never be mistaken for a session
/// token.
pub const API_KEY_PREFIX: &str = "cfk_";

/// Number of random bytes in a generated secret.
const SECRET_BYTES: usize = 32;

/// A long-lived service credential. Deleting the record revokes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    pub secret: String,
    pub creator_type: ActorType,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a key with a freshly generated secret, attributed to `creator`.
    pub fn new(name: Option<String>, creator: &Actor) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            name,
            secret: Self::generate_secret(),
            creator_type: creator.actor_type(),
            creator_id: creator.id().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Generate a new opaque secret: `cfk_` followed by 64 hex characters.
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        format!("{}{}", API_KEY_PREFIX, hex::encode(bytes))
    }

    /// Digest under which a secret is indexed.
    ///
    /// The unique index holds the BLAKE3 digest rather than the secret so
    /// that index keys never expose it.
    pub fn secret_digest(secret: &str) -> String {
        blake3::hash(secret.as_bytes()).to_hex().to_string()
    }
}

impl Document for ApiKey {
    const COLLECTION: &'static str = "api_keys";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn unique_value(&self) -> Option<String> {
        Some(Self::secret_digest(&self.secret))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Only the label can change; the secret is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
}
