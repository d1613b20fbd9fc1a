//! Formal vote domain
//!
//! - [`choice`]: ballot choices and session voting rules
//! - [`tally`]: per-choice counts and their public summary
//! - [`outcome`]: majority outcome and the published result report
//! - [`session`]: the single-active-vote state machine

pub mod choice;
pub mod outcome;
pub mod session;
pub mod tally;

pub use choice::{Choice, VoteRules};
pub use outcome::{VoteOutcome, VoteReport};
pub use session::{
    AutoCloseHandle, BallotAccepted, CloseReason, FinalizeTrigger, VoteClosed, VoteOpened,
    VoteRound, VoteSession,
};
pub use tally::{Tally, TallySummary};
