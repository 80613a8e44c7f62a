//! Persisted record types.
//!
//! Every record is stored as a JSON document keyed by its [`RecordId`].

mod admin;
mod api_key;
mod environment;

pub use admin::{Admin, CreateAdminRequest, LoginRequest, UpdateAdminRequest};
pub use api_key::{ApiKey, CreateApiKeyRequest, UpdateApiKeyRequest, API_KEY_PREFIX};
pub use environment::{CreateEnvironmentRequest, Environment, UpdateEnvironmentRequest};

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of a record identifier in bytes.
pub const RECORD_ID_SIZE: usize = 12;

/// Error returned when a string is not a valid record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid record id {0:?}: expected {len} hex characters", len = RECORD_ID_SIZE * 2)]
pub struct ParseIdError(pub String);

/// 12-byte record identifier rendered as 24 lowercase hex characters.
///
/// Layout: `[unix_seconds (4 bytes, big-endian)][random (8 bytes)]`, so ids
/// sort in creation order when used as sled keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId([u8; RECORD_ID_SIZE]);

impl RecordId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let secs = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let mut bytes = [0u8; RECORD_ID_SIZE];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);
        Self(bytes)
    }

    /// Build an identifier from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; RECORD_ID_SIZE] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Raw bytes, used as the storage key.
    pub fn as_bytes(&self) -> &[u8; RECORD_ID_SIZE] {
        &self.0
    }

    /// Hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != RECORD_ID_SIZE * 2 {
            return Err(ParseIdError(s.to_string()));
        }
        let bytes = hex::decode(s).map_err(|_| ParseIdError(s.to_string()))?;
        Self::from_bytes(&bytes).ok_or_else(|| ParseIdError(s.to_string()))
    }
}

impl TryFrom<String> for RecordId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_hex()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_hex_roundtrip() {
        let id = RecordId::new();
        let hex = id.to_string();
        assert_eq!(hex.len(), 24);
        assert_eq!(hex.parse::<RecordId>().unwrap(), id);
    }

    #[test]
    fn test_record_id_rejects_malformed() {
        assert!("".parse::<RecordId>().is_err());
        assert!("not-hex".parse::<RecordId>().is_err());
        assert!("zzzzzzzzzzzzzzzzzzzzzzzz".parse::<RecordId>().is_err());
        assert!("0123456789abcdef01234567ff".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_record_id_serializes_as_string() {
        let id: RecordId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65a1b2c3d4e5f60718293a4b\"");

        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<RecordId>("\"nope\"").is_err());
    }

    #[test]
    fn test_record_ids_sort_by_creation_second() {
        let early = RecordId::from_bytes(&[0, 0, 0, 1, 9, 9, 9, 9, 9, 9, 9, 9]).unwrap();
        let late = RecordId::from_bytes(&[0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(early < late);
    }
}
