use std::sync::Arc;

use chrono::Utc;

use super::{parse_id, require_name, Page};
use crate::actor::Actor;
use crate::auth::password;
use crate::error::{Error, ServiceError, ServiceResult};
use crate::model::{Admin, CreateAdminRequest, UpdateAdminRequest};
use crate::storage::Store;

/// CRUD over administrator accounts. Usernames are unique.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<Store>,
}

impl AdminService {
    /// Create the service over `store`.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create an administrator on behalf of `actor`.
    pub fn create(&self, actor: &Actor, request: CreateAdminRequest) -> ServiceResult<Admin> {
        let admin = self.insert(&request.username, &request.password)?;
        tracing::info!(id = %admin.id, username = %admin.username, actor = %actor, "administrator created");
        Ok(admin)
    }

    /// Create the initial administrator unless one with this username exists.
    ///
    /// Returns the new record, or `None` if the username was already taken.
    pub fn bootstrap(&self, username: &str, secret: &str) -> ServiceResult<Option<Admin>> {
        match self.insert(username, secret) {
            Ok(admin) => {
                tracing::info!(id = %admin.id, username = %admin.username, "bootstrap administrator created");
                Ok(Some(admin))
            }
            Err(ServiceError::Conflict(_)) => {
                tracing::debug!(username, "bootstrap administrator already exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// List administrators in id order.
    pub fn list(&self, page: Page) -> ServiceResult<Vec<Admin>> {
        Ok(self.store.admins().list(page.skip(), page.limit())?)
    }

    /// Fetch one record by id.
    pub fn get(&self, id: &str) -> ServiceResult<Admin> {
        let id = parse_id(id)?;
        self.store.admins().get(&id)?.ok_or_else(not_found)
    }

    /// Rename and/or rotate the secret. Returns the updated record.
    pub fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateAdminRequest,
    ) -> ServiceResult<Admin> {
        let id = parse_id(id)?;
        let admins = self.store.admins();
        let mut admin = admins.get(&id)?.ok_or_else(not_found)?;

        if let Some(username) = request.username {
            let username = require_name("username", &username)?;
            if admins.unique_taken(&username, Some(&id))? {
                return Err(username_conflict(&username));
            }
            admin.username = username;
        }

        if let Some(secret) = request.password {
            admin.secret_hash = password::hash_password(require_secret(&secret)?)?;
        }

        admin.updated_at = Utc::now();
        admins.replace(&admin).map_err(|e| match e {
            Error::NotFound => not_found(),
            other => other.into(),
        })?;

        tracing::info!(id = %admin.id, actor = %actor, "administrator updated");
        Ok(admin)
    }

    /// Delete an administrator. Returns the removed record.
    ///
    /// Session tokens already issued to the administrator stay valid until
    /// they expire.
    pub fn delete(&self, actor: &Actor, id: &str) -> ServiceResult<Admin> {
        let id = parse_id(id)?;
        let admin = self.store.admins().remove(&id)?.ok_or_else(not_found)?;

        tracing::info!(id = %admin.id, username = %admin.username, actor = %actor, "administrator deleted");
        Ok(admin)
    }

    fn insert(&self, username: &str, secret: &str) -> ServiceResult<Admin> {
        let username = require_name("username", username)?;
        let secret = require_secret(secret)?;
        let admins = self.store.admins();

        if admins.unique_taken(&username, None)? {
            return Err(username_conflict(&username));
        }

        let admin = Admin::new(username, password::hash_password(secret)?);
        admins.insert(&admin)?;
        Ok(admin)
    }
}

fn require_secret(secret: &str) -> ServiceResult<&str> {
    if secret.is_empty() {
        return Err(ServiceError::Validation("password must not be empty".to_string()));
    }
    Ok(secret)
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("admin".to_string())
}

fn username_conflict(username: &str) -> ServiceError {
    ServiceError::Conflict(format!("admin {} already exists", username))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AdminService {
        AdminService::new(Arc::new(Store::temporary().unwrap()))
    }

    fn request(username: &str, password: &str) -> CreateAdminRequest {
        CreateAdminRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_create_hashes_secret() {
        let service = service();
        let admin = service
            .create(&Actor::admin("root"), request("alice", "s3cret"))
            .unwrap();

        assert_eq!(admin.username, "alice");
        assert_ne!(admin.secret_hash, "s3cret");
        assert!(password::verify_password("s3cret", &admin.secret_hash));
        assert_eq!(service.get(&admin.id.to_string()).unwrap(), admin);
    }

    #[test]
    fn test_duplicate_username() {
        let service = service();
        let actor = Actor::admin("root");
        service.create(&actor, request("alice", "a")).unwrap();

        let err = service.create(&actor, request("alice", "b")).unwrap_err();
        assert_eq!(err.to_string(), "admin alice already exists");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let service = service();
        let actor = Actor::admin("root");
        assert!(matches!(
            service.create(&actor, request("", "pw")),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service.create(&actor, request("alice", "")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_bootstrap_is_idempotent() {
        let service = service();
        let first = service.bootstrap("root", "pw123").unwrap();
        assert!(first.is_some());

        let second = service.bootstrap("root", "other").unwrap();
        assert!(second.is_none());

        let admins = service.list(Page::default()).unwrap();
        assert_eq!(admins.len(), 1);
        assert!(password::verify_password("pw123", &admins[0].secret_hash));
    }

    #[test]
    fn test_update_rotates_secret() {
        let service = service();
        let actor = Actor::admin("root");
        let admin = service.create(&actor, request("alice", "old")).unwrap();
        service.create(&actor, request("bob", "pw")).unwrap();

        let updated = service
            .update(
                &actor,
                &admin.id.to_string(),
                UpdateAdminRequest {
                    username: None,
                    password: Some("new".to_string()),
                },
            )
            .unwrap();
        assert!(password::verify_password("new", &updated.secret_hash));
        assert!(!password::verify_password("old", &updated.secret_hash));

        let taken = service.update(
            &actor,
            &admin.id.to_string(),
            UpdateAdminRequest {
                username: Some("bob".to_string()),
                password: None,
            },
        );
        assert!(matches!(taken, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn test_delete() {
        let service = service();
        let actor = Actor::admin("root");
        let admin = service.create(&actor, request("alice", "pw")).unwrap();

        service.delete(&actor, &admin.id.to_string()).unwrap();
        assert!(matches!(
            service.get(&admin.id.to_string()),
            Err(ServiceError::NotFound(_))
        ));

        // Username is free again.
        service.create(&actor, request("alice", "pw")).unwrap();
    }
}
