use std::sync::Arc;

use chrono::Utc;

use super::{parse_id, require_name, Page};
use crate::actor::Actor;
use crate::error::{Error, ServiceError, ServiceResult};
use crate::model::{CreateEnvironmentRequest, Environment, UpdateEnvironmentRequest};
use crate::storage::Store;

/// CRUD over environments. Names are globally unique.
#[derive(Clone)]
pub struct EnvironmentService {
    store: Arc<Store>,
}

impl EnvironmentService {
    /// Create the service over `store`.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create an environment attributed to `actor`.
    pub fn create(
        &self,
        actor: &Actor,
        request: CreateEnvironmentRequest,
    ) -> ServiceResult<Environment> {
        let name = require_name("name", &request.name)?;
        let environments = self.store.environments();

        if environments.unique_taken(&name, None)? {
            return Err(name_conflict(&name));
        }

        let environment = Environment::new(name, actor);
        environments.insert(&environment)?;

        tracing::info!(id = %environment.id, name = %environment.name, actor = %actor, "environment created");
        Ok(environment)
    }

    /// List environments in id order.
    pub fn list(&self, page: Page) -> ServiceResult<Vec<Environment>> {
        Ok(self
            .store
            .environments()
            .list(page.skip(), page.limit())?)
    }

    /// Fetch one record by id.
    pub fn get(&self, id: &str) -> ServiceResult<Environment> {
        let id = parse_id(id)?;
        self.store
            .environments()
            .get(&id)?
            .ok_or_else(not_found)
    }

    /// Apply the fields set in `request`. Returns the updated environment.
    pub fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateEnvironmentRequest,
    ) -> ServiceResult<Environment> {
        let id = parse_id(id)?;
        let environments = self.store.environments();
        let mut environment = environments.get(&id)?.ok_or_else(not_found)?;

        if let Some(name) = request.name {
            let name = require_name("name", &name)?;
            if environments.unique_taken(&name, Some(&id))? {
                return Err(name_conflict(&name));
            }
            environment.name = name;
        }

        environment.updated_at = Utc::now();
        environments.replace(&environment).map_err(|e| match e {
            Error::NotFound => not_found(),
            other => other.into(),
        })?;

        tracing::info!(id = %environment.id, actor = %actor, "environment updated");
        Ok(environment)
    }

    /// Delete an environment. Returns the removed record.
    pub fn delete(&self, actor: &Actor, id: &str) -> ServiceResult<Environment> {
        let id = parse_id(id)?;
        let environment = self
            .store
            .environments()
            .remove(&id)?
            .ok_or_else(not_found)?;

        tracing::info!(id = %environment.id, name = %environment.name, actor = %actor, "environment deleted");
        Ok(environment)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("environment".to_string())
}

fn name_conflict(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("environment {} already exists", name))
}
