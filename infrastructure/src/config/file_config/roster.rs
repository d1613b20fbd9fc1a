//! Roster configuration from TOML (`[roster]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw roster configuration from TOML
///
/// `file` takes precedence over `delegates`; with neither set the built-in
/// delegate list is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRosterConfig {
    /// Inline delegate names
    pub delegates: Vec<String>,
    /// Path to a `{"Delegates": {...}}` JSON file
    pub file: Option<PathBuf>,
}
