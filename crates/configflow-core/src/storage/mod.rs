//! Document store for ConfigFlow.
//!
//! Records are JSON documents in sled trees, one tree per collection, each
//! with a unique secondary index. The [`Store`] is also the production
//! [`CredentialStore`] used by the authenticator.

pub mod collection;
pub mod config;
mod store;

pub use collection::{Collection, Document};
pub use config::StorageConfig;
pub use store::{CredentialStore, Store};
