//! Session token codec.
//!
//! Tokens are HS256 JWTs:
//!
//! ```json
//! {
//!   "sub": "65a1b2c3d4e5f60718293a4b",
//!   "iss": "configflow",
//!   "aud": "configflow",
//!   "exp": 1735689600,
//!   "iat": 1735603200,
//!   "jti": "9f0c2d7e4b1a3c5d6e7f8091a2b3c4d5"
//! }
//! ```
//!
//! A token is valid iff the signature verifies with the configured key, the
//! issuer and audience match, and `now < exp + leeway`. The expiry check is
//! done here rather than by `jsonwebtoken` so the boundary is exact.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{AuthConfig, TokenError};

/// Session token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (administrator id).
    pub sub: String,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Token id.
    pub jti: String,
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// Signed compact JWT.
    pub token: String,
    /// Expiry; the token is rejected from this instant on.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl_secs: i64,
    leeway_secs: i64,
}

impl TokenCodec {
    /// Create a codec from the signing key and claim settings in `config`.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.signing_key),
            decoding_key: DecodingKey::from_secret(&config.signing_key),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_secs: i64::try_from(config.token_ttl.as_secs()).unwrap_or(i64::MAX),
            leeway_secs: i64::try_from(config.leeway.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for `admin_id`, valid from now for the configured TTL.
    pub fn issue(&self, admin_id: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(admin_id, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, admin_id: &str, now: i64) -> Result<IssuedToken, TokenError> {
        let exp = now.saturating_add(self.ttl_secs);

        let mut jti = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut jti);

        let claims = Claims {
            sub: admin_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp,
            iat: now,
            jti: hex::encode(jti),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<String, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation())?.claims;

        if now >= claims.exp.saturating_add(self.leeway_secs) {
            return Err(TokenError::Expired);
        }

        if claims.sub.is_empty() {
            return Err(TokenError::Invalid(ErrorKind::InvalidSubject.into()));
        }

        Ok(claims.sub)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const NOW: i64 = 1_700_000_000;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&AuthConfig::new(secret).with_token_ttl(Duration::from_secs(3600)))
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = codec("test-secret-key-for-testing");
        let issued = codec.issue_at("admin-1", NOW).unwrap();

        assert_eq!(issued.expires_at.timestamp(), NOW + 3600);
        assert_eq!(issued.token.split('.').count(), 3);
        assert_eq!(codec.verify_at(&issued.token, NOW).unwrap(), "admin-1");
    }

    #[test]
    fn test_verify_with_wall_clock() {
        let codec = codec("test-secret-key-for-testing");
        let issued = codec.issue("admin-1").unwrap();
        assert_eq!(codec.verify(&issued.token).unwrap(), "admin-1");
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec("test-secret");
        let issued = codec.issue_at("admin-1", NOW).unwrap();
        let exp = NOW + 3600;

        assert!(codec.verify_at(&issued.token, exp - 1).is_ok());
        assert!(matches!(
            codec.verify_at(&issued.token, exp),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            codec.verify_at(&issued.token, exp + 1),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_zero_ttl_is_never_valid() {
        let codec = TokenCodec::new(&AuthConfig::new("test-secret").with_token_ttl(Duration::ZERO));
        let issued = codec.issue_at("admin-1", NOW).unwrap();

        assert!(codec.verify_at(&issued.token, NOW - 1).is_ok());
        assert!(matches!(
            codec.verify_at(&issued.token, NOW),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_leeway_extends_expiry() {
        let codec = TokenCodec::new(
            &AuthConfig::new("test-secret")
                .with_token_ttl(Duration::from_secs(60))
                .with_leeway(Duration::from_secs(30)),
        );
        let issued = codec.issue_at("admin-1", NOW).unwrap();

        assert!(codec.verify_at(&issued.token, NOW + 89).is_ok());
        assert!(codec.verify_at(&issued.token, NOW + 90).is_err());
    }

    #[test]
    fn test_wrong_signing_key() {
        let issued = codec("wrong-secret").issue_at("admin-1", NOW).unwrap();

        let result = codec("correct-secret").verify_at(&issued.token, NOW);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_issuer_mismatch() {
        let issuer_a = TokenCodec::new(&AuthConfig::new("shared").with_issuer("issuer-a"));
        let issuer_b = TokenCodec::new(&AuthConfig::new("shared").with_issuer("issuer-b"));
        let issued = issuer_a.issue_at("admin-1", NOW).unwrap();

        assert!(issuer_a.verify_at(&issued.token, NOW).is_ok());
        assert!(issuer_b.verify_at(&issued.token, NOW).is_err());
    }

    #[test]
    fn test_audience_mismatch() {
        let aud_a = TokenCodec::new(&AuthConfig::new("shared").with_audience("aud-a"));
        let aud_b = TokenCodec::new(&AuthConfig::new("shared").with_audience("aud-b"));
        let issued = aud_a.issue_at("admin-1", NOW).unwrap();

        assert!(aud_b.verify_at(&issued.token, NOW).is_err());
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims {
            sub: "admin-1".to_string(),
            iss: "configflow".to_string(),
            aud: "configflow".to_string(),
            exp: NOW + 60,
            iat: NOW,
            jti: "x".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(codec("test-secret").verify_at(&token, NOW).is_err());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let claims = Claims {
            sub: String::new(),
            iss: "configflow".to_string(),
            aud: "configflow".to_string(),
            exp: NOW + 60,
            iat: NOW,
            jti: "x".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            codec("test-secret").verify_at(&token, NOW),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_tampered_payload() {
        let codec = codec("test-secret");
        let issued = codec.issue_at("admin-1", NOW).unwrap();
        let other = codec.issue_at("admin-2", NOW).unwrap();

        // Splice admin-2's payload under admin-1's signature.
        let parts: Vec<&str> = issued.token.split('.').collect();
        let other_parts: Vec<&str> = other.token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(codec.verify_at(&forged, NOW).is_err());
    }

    #[test]
    fn test_garbage_token() {
        let codec = codec("test-secret");
        assert!(codec.verify_at("aaa.bbb.ccc", NOW).is_err());
        assert!(codec.verify_at("", NOW).is_err());
    }

    #[test]
    fn test_tokens_are_unique() {
        let codec = codec("test-secret");
        let a = codec.issue_at("admin-1", NOW).unwrap();
        let b = codec.issue_at("admin-1", NOW).unwrap();
        assert_ne!(a.token, b.token);
    }
}
