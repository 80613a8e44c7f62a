use std::sync::Arc;

use super::password;
use super::{AuthConfig, AuthError, Credential, CredentialStore, IssuedToken, TokenCodec};
use crate::actor::Actor;

/// Resolves raw credentials to actors and issues administrator tokens.
pub struct Authenticator {
    codec: TokenCodec,
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    /// Create an authenticator that looks credentials up in `store`.
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            codec: TokenCodec::new(config),
            store,
        }
    }

    /// Verify administrator credentials and issue a session token.
    ///
    /// Argon2 verification runs on the blocking pool so concurrent requests
    /// keep making progress.
    pub async fn login(&self, username: &str, secret: &str) -> Result<IssuedToken, AuthError> {
        let admin = self.store.admin_by_username(username).await?;

        let secret = secret.to_string();
        let hash = admin.as_ref().map(|admin| admin.secret_hash.clone());
        let verified = tokio::task::spawn_blocking(move || match hash {
            Some(hash) => password::verify_password(&secret, &hash),
            None => {
                password::verify_dummy(&secret);
                false
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("password verification task failed: {}", e)))?;

        let admin = match admin {
            Some(admin) if verified => admin,
            Some(_) => {
                tracing::debug!(username, "login rejected: secret mismatch");
                return Err(AuthError::Unauthorized);
            }
            None => {
                tracing::debug!(username, "login rejected: unknown username");
                return Err(AuthError::Unauthorized);
            }
        };

        let issued = self
            .codec
            .issue(&admin.id.to_string())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(admin_id = %admin.id, "administrator logged in");
        Ok(issued)
    }

    /// Resolve a raw credential to the actor it identifies.
    pub async fn authenticate(&self, raw: &str) -> Result<Actor, AuthError> {
        match Credential::classify(raw) {
            Some(credential) => self.resolve(credential).await,
            None => {
                tracing::debug!("credential rejected: empty");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Resolve an already classified credential.
    pub async fn resolve(&self, credential: Credential<'_>) -> Result<Actor, AuthError> {
        match credential {
            Credential::SessionToken(token) => match self.codec.verify(token) {
                Ok(admin_id) => Ok(Actor::admin(admin_id)),
                Err(e) => {
                    tracing::debug!(error = %e, "session token rejected");
                    Err(AuthError::Unauthorized)
                }
            },
            Credential::ApiKey(secret) => match self.store.api_key_by_secret(secret).await {
                Ok(Some(key)) => Ok(Actor::api_key(key.id.to_string())),
                Ok(None) => {
                    tracing::debug!("api key rejected: not found");
                    Err(AuthError::Unauthorized)
                }
                Err(e) => {
                    tracing::error!(error = %e, "credential store lookup failed");
                    Err(e.into())
                }
            },
        }
    }
}
