use std::sync::Arc;

use chrono::Utc;

use super::{parse_id, Page};
use crate::actor::Actor;
use crate::error::{Error, ServiceError, ServiceResult};
use crate::model::{ApiKey, CreateApiKeyRequest, UpdateApiKeyRequest};
use crate::storage::Store;

/// CRUD over API keys. Deleting a key revokes it.
#[derive(Clone)]
pub struct ApiKeyService {
    store: Arc<Store>,
}

impl ApiKeyService {
    /// Create the service over `store`.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Generate a key attributed to `actor`. The returned record carries the
    /// secret.
    pub fn create(&self, actor: &Actor, request: CreateApiKeyRequest) -> ServiceResult<ApiKey> {
        let key = ApiKey::new(normalize_name(request.name), actor);
        self.store.api_keys().insert(&key)?;

        tracing::info!(id = %key.id, actor = %actor, "api key created");
        Ok(key)
    }

    /// List API keys in id order.
    pub fn list(&self, page: Page) -> ServiceResult<Vec<ApiKey>> {
        Ok(self.store.api_keys().list(page.skip(), page.limit())?)
    }

    /// Fetch one record by id.
    pub fn get(&self, id: &str) -> ServiceResult<ApiKey> {
        let id = parse_id(id)?;
        self.store.api_keys().get(&id)?.ok_or_else(not_found)
    }

    /// Change the label. Returns the updated record.
    pub fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateApiKeyRequest,
    ) -> ServiceResult<ApiKey> {
        let id = parse_id(id)?;
        let api_keys = self.store.api_keys();
        let mut key = api_keys.get(&id)?.ok_or_else(not_found)?;

        key.name = normalize_name(request.name);
        key.updated_at = Utc::now();
        api_keys.replace(&key).map_err(|e| match e {
            Error::NotFound => not_found(),
            other => other.into(),
        })?;

        tracing::info!(id = %key.id, actor = %actor, "api key updated");
        Ok(key)
    }

    /// Revoke a key. Returns the removed record.
    pub fn delete(&self, actor: &Actor, id: &str) -> ServiceResult<ApiKey> {
        let id = parse_id(id)?;
        let key = self.store.api_keys().remove(&id)?.ok_or_else(not_found)?;

        tracing::info!(id = %key.id, actor = %actor, "api key revoked");
        Ok(key)
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("api key".to_string())
}
