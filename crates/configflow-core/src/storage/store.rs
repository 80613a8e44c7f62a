use async_trait::async_trait;
use sled::Db;
use subtle::ConstantTimeEq;

use super::{Collection, StorageConfig};
use crate::error::Result;
use crate::model::{Admin, ApiKey, Environment};

/// Point lookups the authenticator needs from persistence.
///
/// Implementations must not cache results: a deleted API key has to fail on
/// the very next lookup.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an administrator by username.
    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>>;

    /// Find an API key by its secret value.
    async fn api_key_by_secret(&self, secret: &str) -> Result<Option<ApiKey>>;
}

/// The sled-backed store holding every ConfigFlow collection.
pub struct Store {
    db: Db,
    admins: Collection<Admin>,
    api_keys: Collection<ApiKey>,
    environments: Collection<Environment>,
}

impl Store {
    /// Open or create a store with the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self> {
        let db = config.to_sled_config().open()?;
        let admins = Collection::open(&db)?;
        let api_keys = Collection::open(&db)?;
        let environments = Collection::open(&db)?;

        tracing::debug!(
            admins = admins.len(),
            api_keys = api_keys.len(),
            environments = environments.len(),
            recovered = db.was_recovered(),
            "store opened"
        );

        Ok(Self {
            db,
            admins,
            api_keys,
            environments,
        })
    }

    /// Open a temporary store that is deleted on drop.
    pub fn temporary() -> Result<Self> {
        Self::open(StorageConfig::temporary())
    }

    pub fn admins(&self) -> &Collection<Admin> {
        &self.admins
    }

    pub fn api_keys(&self) -> &Collection<ApiKey> {
        &self.api_keys
    }

    pub fn environments(&self) -> &Collection<Environment> {
        &self.environments
    }

    /// Check if the database was recovered from a previous crash.
    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }

    /// Check that the underlying database answers.
    pub fn ping(&self) -> Result<u64> {
        Ok(self.db.size_on_disk()?)
    }

    /// Flush dirty pages to disk. Returns the number of bytes flushed.
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }
}

#[async_trait]
impl CredentialStore for Store {
    async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        self.admins.find_unique(username)
    }

    async fn api_key_by_secret(&self, secret: &str) -> Result<Option<ApiKey>> {
        let digest = ApiKey::secret_digest(secret);
        let key = self.api_keys.find_unique(&digest)?;

        // The index is keyed by digest; confirm the stored secret itself.
        Ok(key.filter(|key| bool::from(key.secret.as_bytes().ct_eq(secret.as_bytes()))))
    }
}
