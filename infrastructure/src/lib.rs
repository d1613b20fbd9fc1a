//! Infrastructure layer for plenary
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod identity;
pub mod logging;
pub mod roster;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileRosterConfig,
    FileSessionConfig,
};
pub use identity::RosterIdentityResolver;
pub use logging::JsonlSessionLogger;
pub use roster::{DEFAULT_DELEGATES, RosterLoadError, RosterLoader};
