//! Caller identity value objects
//!
//! Identity is resolved by an external collaborator. The core only sees the
//! resolved id and role attached to every inbound action.

use serde::{Deserialize, Serialize};

/// Author string used for moderator-originated ledger entries
pub const CHAIR: &str = "CHAIR";

/// Role of a caller as resolved by the identity collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Moderator,
    #[default]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Participant => "participant",
            Role::Moderator => "moderator",
            Role::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "participant" | "delegate" => Ok(Role::Participant),
            "moderator" | "chair" | "admin" => Ok(Role::Moderator),
            "unknown" | "guest" => Ok(Role::Unknown),
            other => Err(format!(
                "Unknown role: {}. Valid: participant, moderator, unknown",
                other
            )),
        }
    }
}

/// A resolved caller (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn participant(id: impl Into<String>) -> Self {
        Self::new(id, Role::Participant)
    }

    /// The moderator always acts under the [`CHAIR`] identity
    pub fn moderator() -> Self {
        Self::new(CHAIR, Role::Moderator)
    }

    pub fn unknown(id: impl Into<String>) -> Self {
        Self::new(id, Role::Unknown)
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn is_participant(&self) -> bool {
        self.role == Role::Participant
    }

    /// Author string recorded on ledger entries created by this caller
    pub fn author(&self) -> &str {
        if self.is_moderator() { CHAIR } else { &self.id }
    }
}
