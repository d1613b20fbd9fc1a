//! Application layer for plenary
//!
//! This crate contains the session coordinator, its ports, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionConfig;
pub use ports::{
    identity::IdentityResolver,
    session_logger::{NoSessionLogger, SessionLogEvent, SessionLogger},
};
pub use use_cases::auto_close::AutoCloseTimer;
pub use use_cases::broadcast::{BroadcastCoordinator, ObserverSubscription};
pub use use_cases::session_coordinator::SessionCoordinator;
