//! Application-level configuration.
//!
//! - [`SessionConfig`]: auto-close duration, voting rules and observer buffering

pub mod session_config;

pub use session_config::SessionConfig;
