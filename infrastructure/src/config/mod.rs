//! Configuration file loading for plenary
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PLENARY_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./plenary.toml` or `./.plenary.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/plenary/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileRosterConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
