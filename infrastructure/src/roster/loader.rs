//! Delegate roster loader
//!
//! A roster file is a JSON object whose `Delegates` member is keyed by
//! delegate name:
//!
//! ```json
//! {"Delegates": {"France": {"flag": "fr"}, "India": {}}}
//! ```
//!
//! Only the keys are used. Names are trimmed and uppercased so they match
//! what the identity resolver produces.

use crate::config::FileRosterConfig;
use plenary_domain::EligibleRoster;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Built-in roster used when nothing is configured
pub const DEFAULT_DELEGATES: [&str; 5] = ["FRANCE", "ISRAEL", "AUSTRALIA", "INDIA", "CHINA"];

#[derive(Debug, Error)]
pub enum RosterLoadError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid roster file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("roster file {0} lists no delegates")]
    Empty(PathBuf),
}

#[derive(Deserialize)]
struct RosterFile {
    #[serde(rename = "Delegates")]
    delegates: Map<String, Value>,
}

pub struct RosterLoader;

impl RosterLoader {
    /// Resolve the roster from `[roster]` settings
    ///
    /// A configured file that does not exist falls back to the inline list
    /// or the defaults with a warning; a file that exists but is malformed
    /// is an error.
    pub fn from_config(config: &FileRosterConfig) -> Result<EligibleRoster, RosterLoadError> {
        if let Some(path) = &config.file {
            match Self::load_file(path) {
                Ok(roster) => return Ok(roster),
                Err(RosterLoadError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    warn!(
                        "Roster file {} not found, using {} roster",
                        path.display(),
                        if config.delegates.is_empty() {
                            "default"
                        } else {
                            "inline"
                        }
                    );
                }
                Err(e) => return Err(e),
            }
        }

        if config.delegates.is_empty() {
            Ok(Self::defaults())
        } else {
            Ok(EligibleRoster::new(
                config.delegates.iter().filter_map(|d| normalize(d)),
            ))
        }
    }

    pub fn load_file(path: &Path) -> Result<EligibleRoster, RosterLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| RosterLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::parse(&content).map_err(|source| RosterLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if roster.is_empty() {
            return Err(RosterLoadError::Empty(path.to_path_buf()));
        }
        info!("Loaded {} delegates from {}", roster.len(), path.display());
        Ok(roster)
    }

    pub fn parse(json: &str) -> Result<EligibleRoster, serde_json::Error> {
        let file: RosterFile = serde_json::from_str(json)?;
        Ok(EligibleRoster::new(
            file.delegates.keys().filter_map(|k| normalize(k)),
        ))
    }

    pub fn defaults() -> EligibleRoster {
        EligibleRoster::new(DEFAULT_DELEGATES)
    }
}

fn normalize(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_uppercase())
}
