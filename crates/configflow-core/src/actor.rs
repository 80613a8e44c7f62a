//! Caller identity resolved by the authenticator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of credential an actor authenticated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    /// An administrator holding a session token.
    Admin,
    /// A service holding an API key.
    ApiKey,
}

impl ActorType {
    /// Wire name of the actor type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Admin => "admin",
            ActorType::ApiKey => "api_key",
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved caller identity.
///
/// For [`ActorType::Admin`] the id is the administrator record id, for
/// [`ActorType::ApiKey`] it is the API key record id. Fields are private so
/// an actor cannot be altered once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    #[serde(rename = "type")]
    actor_type: ActorType,
    id: String,
}

impl Actor {
    /// Create an administrator actor.
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            actor_type: ActorType::Admin,
            id: id.into(),
        }
    }

    /// Create an API key actor.
    pub fn api_key(id: impl Into<String>) -> Self {
        Self {
            actor_type: ActorType::ApiKey,
            id: id.into(),
        }
    }

    /// Kind of credential that authenticated this actor.
    pub fn actor_type(&self) -> ActorType {
        self.actor_type
    }

    /// Record id of the administrator or API key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if this actor is an administrator.
    pub fn is_admin(&self) -> bool {
        self.actor_type == ActorType::Admin
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.actor_type, self.id)
    }
}
