use std::fmt;
use std::time::Duration;

/// Default session token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Default issuer and audience.
const DEFAULT_ISSUER: &str = "configflow";

/// Immutable token settings, built once at startup and passed by reference
/// into [`TokenCodec::new`](super::TokenCodec::new) and
/// [`Authenticator::new`](super::Authenticator::new).
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing key.
    pub signing_key: Vec<u8>,

    /// Issuer embedded in and required of every token.
    pub issuer: String,

    /// Audience embedded in and required of every token.
    pub audience: String,

    /// Lifetime of issued tokens.
    pub token_ttl: Duration,

    /// Clock skew tolerated past `exp`. Zero means exact expiry comparison.
    pub leeway: Duration,
}

impl AuthConfig {
    /// Create a configuration with the default issuer, audience and TTL.
    pub fn new(signing_key: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_key: signing_key.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_ISSUER.to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            leeway: Duration::ZERO,
        }
    }

    /// Set the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Set the token lifetime.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the expiry leeway.
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }
}

// The signing key must never end up in logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_ttl", &self.token_ttl)
            .field("leeway", &self.leeway)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("secret");
        assert_eq!(config.issuer, "configflow");
        assert_eq!(config.audience, "configflow");
        assert_eq!(config.token_ttl, Duration::from_secs(86400));
        assert_eq!(config.leeway, Duration::ZERO);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AuthConfig::new("super-secret-key").with_issuer("issuer-a");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("issuer-a"));
    }
}
