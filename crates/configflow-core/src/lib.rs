//! ConfigFlow Core - credential store, authenticator and resource services.
//!
//! This crate provides everything behind the HTTP surface of ConfigFlow:
//! - A sled-backed document store with unique indexes
//! - The dual-mode authenticator (admin session tokens and API keys)
//! - Environment, admin and API key services with actor attribution

pub mod actor;
pub mod auth;
pub mod error;
pub mod model;
pub mod service;
pub mod storage;

pub use actor::{Actor, ActorType};
pub use auth::{AuthConfig, AuthError, Authenticator, CredentialStore, IssuedToken, TokenCodec};
pub use error::{ServiceError, ServiceResult};
pub use model::{Admin, ApiKey, Environment, RecordId};
pub use service::{AdminService, ApiKeyService, EnvironmentService, Page};
pub use storage::{Store, StorageConfig};
