//! Ballot choices and the rules that govern them

use crate::core::error::SessionError;
use serde::{Deserialize, Serialize};

/// A participant's choice on the document under vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Yay,
    Nay,
    Abstain,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Yay => "yay",
            Choice::Nay => "nay",
            Choice::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Choice {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yay" => Ok(Choice::Yay),
            "nay" => Ok(Choice::Nay),
            "abstain" => Ok(Choice::Abstain),
            _ => Err(SessionError::InvalidChoice),
        }
    }
}

/// Voting rules fixed for the lifetime of a session
///
/// `count_abstain_in_total` decides how abstentions show up in displayed
/// totals. When `false`, abstainers are removed from both the counted votes
/// and the eligible denominator. The pass/fail outcome never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRules {
    pub allow_abstain: bool,
    pub count_abstain_in_total: bool,
}

impl Default for VoteRules {
    fn default() -> Self {
        Self {
            allow_abstain: true,
            count_abstain_in_total: true,
        }
    }
}

impl VoteRules {
    pub fn allows(&self, choice: Choice) -> bool {
        choice != Choice::Abstain || self.allow_abstain
    }

    /// Parse a raw choice and check it against these rules
    pub fn parse_choice(&self, raw: &str) -> Result<Choice, SessionError> {
        let choice: Choice = raw.parse()?;
        if self.allows(choice) {
            Ok(choice)
        } else {
            Err(SessionError::InvalidChoice)
        }
    }

    /// Allowed choices in display order
    pub fn allowed_choices(&self) -> Vec<Choice> {
        if self.allow_abstain {
            vec![Choice::Yay, Choice::Nay, Choice::Abstain]
        } else {
            vec![Choice::Yay, Choice::Nay]
        }
    }
}
