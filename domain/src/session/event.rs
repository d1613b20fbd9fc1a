//! Observer-facing push events

use super::snapshot::SessionSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ObserverEvent {
    /// Full state after an accepted mutation
    SnapshotUpdate(SessionSnapshot),
    /// A ballot was accepted (counts only, no identities)
    VoteTallyDelta {
        voter_count: usize,
        total_eligible: usize,
    },
    VoteStarted {
        target_title: String,
    },
    VoteEnded,
}

impl ObserverEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ObserverEvent::SnapshotUpdate(_) => "snapshot_update",
            ObserverEvent::VoteTallyDelta { .. } => "vote_tally_delta",
            ObserverEvent::VoteStarted { .. } => "vote_started",
            ObserverEvent::VoteEnded => "vote_ended",
        }
    }

    pub fn as_snapshot(&self) -> Option<&SessionSnapshot> {
        match self {
            ObserverEvent::SnapshotUpdate(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
