//! Resource services: CRUD with actor attribution.
//!
//! Services are synchronous; every call is one sled read or one sled
//! transaction. Callers pass the resolved [`Actor`](crate::Actor) explicitly.

mod admin;
mod api_key;
mod environment;

pub use admin::AdminService;
pub use api_key::ApiKeyService;
pub use environment::EnvironmentService;

use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};
use crate::model::RecordId;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Zero-based page selection for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Zero-based page index.
    #[serde(default)]
    pub page: usize,
    /// Requested page size.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Page {
    /// Select page `page` of `size` records.
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> usize {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of records to skip.
    pub fn skip(&self) -> usize {
        self.page.saturating_mul(self.limit())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Parse a client-supplied identifier.
pub(crate) fn parse_id(id: &str) -> ServiceResult<RecordId> {
    id.parse::<RecordId>()
        .map_err(|e| ServiceError::Validation(e.to_string()))
}

/// Reject empty or blank names.
pub(crate) fn require_name(field: &str, value: &str) -> ServiceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}
