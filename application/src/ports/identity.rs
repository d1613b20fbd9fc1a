//! Identity resolution port
//!
//! Authentication lives outside the session engine. An adapter turns
//! whatever the transport knows about a caller into a resolved
//! [`Caller`] before any action reaches the coordinator.

use plenary_domain::{Caller, EligibleRoster};

pub trait IdentityResolver: Send + Sync {
    /// Resolve a raw caller name; unrecognised names get [`Role::Unknown`](plenary_domain::Role::Unknown)
    fn resolve(&self, name: &str) -> Caller;

    /// Participants eligible to vote
    fn roster(&self) -> &EligibleRoster;
}
