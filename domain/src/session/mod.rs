//! Session-facing models
//!
//! - [`action`]: inbound action payloads and their outcomes
//! - [`snapshot`]: full state pushed to observers
//! - [`event`]: observer push events

pub mod action;
pub mod event;
pub mod snapshot;

pub use action::{ActionOutcome, SessionAction};
pub use event::ObserverEvent;
pub use snapshot::{CallerVoteStatus, SessionSnapshot, VoteStatus};
