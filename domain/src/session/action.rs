//! Action API payloads
//!
//! Each inbound action arrives as one of these plus a resolved
//! [`Caller`](crate::core::identity::Caller).

use crate::document::entities::{DocumentId, DocumentKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    SubmitDocument {
        kind: DocumentKind,
        title: String,
        #[serde(default)]
        body: String,
    },
    CastBallot {
        choice: String,
    },
    StartVote {
        target_id: DocumentId,
    },
    FinalizeVote,
    ClearAll,
    Announce {
        #[serde(default)]
        body: String,
    },
}

impl SessionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::SubmitDocument { .. } => "submit_document",
            SessionAction::CastBallot { .. } => "cast_ballot",
            SessionAction::StartVote { .. } => "start_vote",
            SessionAction::FinalizeVote => "finalize_vote",
            SessionAction::ClearAll => "clear_all",
            SessionAction::Announce { .. } => "announce",
        }
    }

    /// Actions reserved for the moderator
    pub fn is_moderator_action(&self) -> bool {
        matches!(
            self,
            SessionAction::StartVote { .. }
                | SessionAction::FinalizeVote
                | SessionAction::ClearAll
                | SessionAction::Announce { .. }
        )
    }
}

/// Successful result of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A new ledger entry was created
    Created { id: DocumentId },
    Ack,
}
