//! Presentation layer for plenary
//!
//! This crate contains CLI definitions, output formatters,
//! and the JSON-lines action script runner.

pub mod cli;
pub mod config;
pub mod output;
pub mod script;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::OutputConfig;
pub use output::{ConsoleFormatter, JsonFormatter, OutputFormatter};
pub use script::{ScriptError, ScriptRunner, ScriptSummary};
