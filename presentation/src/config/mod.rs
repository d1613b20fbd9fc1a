//! Presentation-level configuration
//!
//! Output settings derived from the command line.

use crate::cli::commands::{Cli, OutputFormat};
use crate::output::{ConsoleFormatter, JsonFormatter, OutputFormatter};

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Render the whole board on every snapshot update
    pub full_snapshots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            full_snapshots: false,
        }
    }
}

impl OutputConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.output,
            color: !cli.no_color && cli.output == OutputFormat::Text,
            full_snapshots: cli.full_snapshots,
        }
    }

    /// Build the formatter and apply the color setting
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        if !self.color {
            colored::control::set_override(false);
        }
        match self.format {
            OutputFormat::Text => Box::new(ConsoleFormatter::new(self.full_snapshots)),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}
