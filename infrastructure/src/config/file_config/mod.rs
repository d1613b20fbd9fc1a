//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

mod logging;
mod roster;
mod session;

pub use logging::FileLoggingConfig;
pub use roster::FileRosterConfig;
pub use session::FileSessionConfig;

use plenary_application::SessionConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("session.auto_close_seconds cannot be 0")]
    InvalidAutoClose,

    #[error("session.observer_buffer cannot be 0")]
    InvalidObserverBuffer,

    #[error("session.chair_code cannot be empty")]
    EmptyChairCode,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Voting rules and timers
    pub session: FileSessionConfig,
    /// Eligible delegates
    pub roster: FileRosterConfig,
    /// Transcript output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.session.auto_close_seconds == 0 {
            return Err(ConfigValidationError::InvalidAutoClose);
        }
        if self.session.observer_buffer == 0 {
            return Err(ConfigValidationError::InvalidObserverBuffer);
        }
        if self.session.chair_code.trim().is_empty() {
            return Err(ConfigValidationError::EmptyChairCode);
        }
        Ok(())
    }

    /// Convert to the application-level session configuration.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_auto_close(Duration::from_secs(self.session.auto_close_seconds))
            .with_allow_abstain(self.session.allow_abstain)
            .with_count_abstain_in_total(self.session.count_abstain_in_total)
            .with_observer_buffer(self.session.observer_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[session]
auto_close_seconds = 45
allow_abstain = false
count_abstain_in_total = false
observer_buffer = 16
chair_code = "CHAIRMAN"

[roster]
delegates = ["FRANCE", "INDIA"]
file = "delegates.json"

[logging]
transcript = "logs/session.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.auto_close_seconds, 45);
        assert!(!config.session.allow_abstain);
        assert!(!config.session.count_abstain_in_total);
        assert_eq!(config.session.observer_buffer, 16);
        assert_eq!(config.session.chair_code, "CHAIRMAN");
        assert_eq!(config.roster.delegates, vec!["FRANCE", "INDIA"]);
        assert_eq!(config.roster.file, Some(PathBuf::from("delegates.json")));
        assert_eq!(
            config.logging.transcript,
            Some(PathBuf::from("logs/session.jsonl"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[session]
auto_close_seconds = 10
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.auto_close_seconds, 10);
        // Defaults should apply
        assert!(config.session.allow_abstain);
        assert_eq!(config.session.chair_code, "ADMIN");
        assert!(config.roster.delegates.is_empty());
        assert!(config.logging.transcript.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        assert!(config.validate().is_ok());

        config.session.auto_close_seconds = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidAutoClose)
        );

        config.session.auto_close_seconds = 30;
        config.session.observer_buffer = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidObserverBuffer)
        );

        config.session.observer_buffer = 8;
        config.session.chair_code = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyChairCode));
    }

    #[test]
    fn test_to_session_config() {
        let mut config = FileConfig::default();
        config.session.auto_close_seconds = 5;
        config.session.allow_abstain = false;
        config.session.observer_buffer = 4;

        let session = config.to_session_config();
        assert_eq!(session.auto_close, Duration::from_secs(5));
        assert!(!session.rules.allow_abstain);
        assert!(session.rules.count_abstain_in_total);
        assert_eq!(session.observer_buffer, 4);
    }
}
