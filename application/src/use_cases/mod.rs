//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod auto_close;
pub mod broadcast;
pub mod session_coordinator;
