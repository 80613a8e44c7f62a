//! Authentication for ConfigFlow.
//!
//! Two credential types are accepted on every request:
//!
//! - **Session tokens**: HS256 JWTs issued to administrators by
//!   [`Authenticator::login`]. Stateless; valid until `exp`.
//! - **API keys**: opaque `cfk_...` secrets looked up in the
//!   [`CredentialStore`] on every request. Revoked by deleting the record.
//!
//! [`Authenticator::authenticate`] classifies a raw credential up front (see
//! [`Credential`]) and resolves it to an [`Actor`](crate::Actor). Every
//! rejection is the same [`AuthError::Unauthorized`]; only store failures are
//! reported differently, as [`AuthError::Internal`].
//!
//! # Actor identity
//!
//! A session token's `sub` claim is the administrator's record id, not the
//! username, and an admin [`Actor`](crate::Actor) resolved from a token
//! carries that id. Renaming an administrator does not invalidate tokens.
//! API key actors carry the key's record id.
//!
//! # Known limitation
//!
//! A session token stays valid until its embedded expiry even if the
//! administrator it names is deleted. The window is bounded by the token TTL.

mod authenticator;
mod config;
mod credential;
mod error;
pub mod password;
mod token;

pub use authenticator::Authenticator;
pub use config::{AuthConfig, DEFAULT_TOKEN_TTL_SECS};
pub use credential::Credential;
pub use error::{AuthError, PasswordError, TokenError};
pub use token::{Claims, IssuedToken, TokenCodec};

pub use crate::storage::CredentialStore;
