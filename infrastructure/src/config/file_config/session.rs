//! Session configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Seconds before an open vote closes itself
    pub auto_close_seconds: u64,
    /// Offer ABSTAIN as a ballot choice
    pub allow_abstain: bool,
    /// Count abstentions in `voter_count` and the eligible total
    pub count_abstain_in_total: bool,
    /// Per-observer event buffer before an observer starts lagging
    pub observer_buffer: usize,
    /// Name that signs in as the chair
    pub chair_code: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            auto_close_seconds: 30,
            allow_abstain: true,
            count_abstain_in_total: true,
            observer_buffer: 64,
            chair_code: "ADMIN".to_string(),
        }
    }
}
