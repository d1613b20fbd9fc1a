//! Domain layer for plenary
//!
//! This crate contains the session state engine's business rules: the
//! document ledger, the single-active-vote state machine, and the snapshot
//! model observers reconcile to. It has no dependencies on async runtimes,
//! transport or rendering.
//!
//! # Core Concepts
//!
//! ## Ledger
//!
//! An append-only chronological record of resolutions, amendments,
//! announcements and vote results. Displayed newest first.
//!
//! ## Formal vote
//!
//! At most one vote is active at a time. Each eligible participant may cast
//! one ballot. Closing the vote (by the moderator or by auto-close)
//! publishes exactly one `vote_result` entry.

pub mod core;
pub mod document;
pub mod roster;
pub mod session;
pub mod vote;

// Re-export commonly used types
pub use core::{
    error::SessionError,
    identity::{CHAIR, Caller, Role},
};
pub use document::{DocumentDraft, DocumentEntry, DocumentId, DocumentKind, DocumentLedger};
pub use roster::EligibleRoster;
pub use session::{
    ActionOutcome, CallerVoteStatus, ObserverEvent, SessionAction, SessionSnapshot, VoteStatus,
};
pub use vote::{
    AutoCloseHandle, BallotAccepted, Choice, CloseReason, FinalizeTrigger, Tally, TallySummary,
    VoteClosed, VoteOpened, VoteOutcome, VoteReport, VoteRound, VoteRules, VoteSession,
};
