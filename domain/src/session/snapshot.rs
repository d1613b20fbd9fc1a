//! Snapshot model pushed to observers

use crate::document::entities::{DocumentEntry, DocumentId};
use crate::vote::session::VoteRound;
use crate::vote::tally::TallySummary;
use serde::{Deserialize, Serialize};

/// Live vote status as seen by every observer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteStatus {
    pub active: bool,
    pub round: Option<VoteRound>,
    pub target_id: Option<DocumentId>,
    pub target_title: Option<String>,
    pub tally: Option<TallySummary>,
}

impl VoteStatus {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Full session state: documents newest first plus vote status
///
/// `version` increases with every accepted mutation, so an observer can
/// drop any snapshot older than the one it already holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u64,
    pub documents: Vec<DocumentEntry>,
    pub vote_status: VoteStatus,
}

impl SessionSnapshot {
    pub fn is_newer_than(&self, other: &SessionSnapshot) -> bool {
        self.version > other.version
    }
}

/// Vote status personalised for one caller (polling query)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallerVoteStatus {
    pub active: bool,
    pub target_title: Option<String>,
    pub tally: Option<TallySummary>,
    pub has_voted: bool,
}
