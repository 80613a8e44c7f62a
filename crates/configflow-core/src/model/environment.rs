use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::actor::{Actor, ActorType};
use crate::storage::Document;

/// An attributed environment. Names are globally unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: RecordId,
    pub name: String,
    pub creator_type: ActorType,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Environment {
    /// Create a new environment attributed to `creator`.
    pub fn new(name: impl Into<String>, creator: &Actor) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            name: name.into(),
            creator_type: creator.actor_type(),
            creator_id: creator.id().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The actor that created this environment.
    pub fn creator(&self) -> Actor {
        match self.creator_type {
            ActorType::Admin => Actor::admin(&self.creator_id),
            ActorType::ApiKey => Actor::api_key(&self.creator_id),
        }
    }
}

impl Document for Environment {
    const COLLECTION: &'static str = "environments";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn unique_value(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnvironmentRequest {
    pub name: String,
}

/// Fields left as `None` are not changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEnvironmentRequest {
    #[serde(default)]
    pub name: Option<String>,
}
