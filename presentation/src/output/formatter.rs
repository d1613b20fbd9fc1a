//! Output formatter trait

use crate::script::{QueryResult, ScriptSummary, StepReport};
use plenary_domain::{Caller, ObserverEvent, SessionSnapshot};

/// Trait for rendering script progress and observer traffic
pub trait OutputFormatter: Send + Sync {
    /// Render the outcome of one action line
    fn format_step(&self, report: &StepReport) -> String;

    /// Render a query result
    fn format_query(&self, line: usize, caller: &Caller, result: &QueryResult) -> String;

    /// Render an observer event; `None` suppresses it
    fn format_event(&self, event: &ObserverEvent) -> Option<String>;

    /// Render a full session snapshot
    fn format_snapshot(&self, snapshot: &SessionSnapshot) -> String;

    /// Render the closing counters
    fn format_summary(&self, summary: &ScriptSummary) -> String;
}
