//! Script line model
//!
//! One JSON object per line:
//!
//! ```text
//! {"caller": "FRANCE", "action": "submit_document", "kind": "resolution", "title": "Ocean", "body": "..."}
//! {"caller": "ADMIN", "action": "start_vote", "target": "Ocean"}
//! {"caller": "INDIA", "action": "cast_ballot", "choice": "yay"}
//! {"caller": "INDIA", "query": "vote_status"}
//! {"wait_secs": 5}
//! ```
//!
//! `start_vote` accepts either a `target_id` or a `target` title. Blank
//! lines and lines starting with `#` are skipped.

use plenary_domain::{
    ActionOutcome, Caller, CallerVoteStatus, DocumentEntry, SessionAction, SessionError,
    SessionSnapshot,
};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptQuery {
    VoteStatus,
    ListVotable,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Let time pass (auto-close timers keep running)
    Wait(Duration),
    Query {
        caller: String,
        query: ScriptQuery,
    },
    Action {
        caller: String,
        action: SessionAction,
    },
    /// `start_vote` naming its target by title instead of id
    StartVoteByTitle {
        caller: String,
        title: String,
    },
}

#[derive(Deserialize)]
struct WaitLine {
    wait_secs: f64,
}

#[derive(Deserialize)]
struct QueryLine {
    caller: String,
    query: ScriptQuery,
}

#[derive(Deserialize)]
struct ActionLine {
    caller: String,
    #[serde(flatten)]
    action: SessionAction,
}

impl ScriptStep {
    /// Parse one script line; `Ok(None)` for blank and comment lines
    pub fn parse(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(line)?;

        if value.get("wait_secs").is_some() {
            let wait: WaitLine = serde_json::from_value(value)?;
            let duration = Duration::try_from_secs_f64(wait.wait_secs)
                .map_err(|e| serde_json::Error::custom(format!("wait_secs: {}", e)))?;
            return Ok(Some(ScriptStep::Wait(duration)));
        }

        if value.get("query").is_some() {
            let query: QueryLine = serde_json::from_value(value)?;
            return Ok(Some(ScriptStep::Query {
                caller: query.caller,
                query: query.query,
            }));
        }

        let is_start_vote = value.get("action").and_then(Value::as_str) == Some("start_vote");
        if is_start_vote
            && value.get("target_id").is_none()
            && let Some(title) = value.get("target").and_then(Value::as_str)
        {
            let caller = value
                .get("caller")
                .and_then(Value::as_str)
                .ok_or_else(|| serde_json::Error::missing_field("caller"))?;
            return Ok(Some(ScriptStep::StartVoteByTitle {
                caller: caller.to_string(),
                title: title.to_string(),
            }));
        }

        let action: ActionLine = serde_json::from_value(value)?;
        Ok(Some(ScriptStep::Action {
            caller: action.caller,
            action: action.action,
        }))
    }
}

/// Result of a query step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "query", content = "result", rename_all = "snake_case")]
pub enum QueryResult {
    VoteStatus(CallerVoteStatus),
    ListVotable(Vec<DocumentEntry>),
    Snapshot(SessionSnapshot),
}

/// One executed action line
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub line: usize,
    pub caller: Caller,
    pub action: &'static str,
    pub result: Result<ActionOutcome, SessionError>,
}

/// Counters for a finished script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScriptSummary {
    pub actions: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub queries: usize,
}

impl ScriptSummary {
    pub fn record(&mut self, report: &StepReport) {
        self.actions += 1;
        if report.result.is_ok() {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }
}
