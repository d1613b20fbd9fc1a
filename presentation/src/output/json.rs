//! JSON-lines output formatter
//!
//! Every record is a single JSON object with a `type` field, so the output
//! of a script run can be piped straight into another tool.

use crate::output::formatter::OutputFormatter;
use crate::script::{QueryResult, ScriptSummary, StepReport};
use plenary_domain::{Caller, ObserverEvent, SessionSnapshot};
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    fn tagged(kind: &str, value: impl Serialize) -> String {
        let mut map = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
            Err(e) => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::from(e.to_string()));
                map
            }
        };
        map.insert("type".to_string(), Value::from(kind));
        Value::Object(map).to_string()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_step(&self, report: &StepReport) -> String {
        let mut record = json!({
            "line": report.line,
            "caller": report.caller.id,
            "role": report.caller.role,
            "action": report.action,
            "ok": report.result.is_ok(),
        });
        match &report.result {
            Ok(outcome) => record["outcome"] = json!(outcome),
            Err(e) => {
                record["error"] = json!({
                    "code": e.code(),
                    "message": e.to_string(),
                })
            }
        }
        Self::tagged("step", record)
    }

    fn format_query(&self, line: usize, caller: &Caller, result: &QueryResult) -> String {
        let mut record = json!(result);
        record["line"] = json!(line);
        record["caller"] = json!(caller.id);
        Self::tagged("query", record)
    }

    fn format_event(&self, event: &ObserverEvent) -> Option<String> {
        Some(Self::tagged("event", event))
    }

    fn format_snapshot(&self, snapshot: &SessionSnapshot) -> String {
        Self::tagged("snapshot", snapshot)
    }

    fn format_summary(&self, summary: &ScriptSummary) -> String {
        Self::tagged("summary", summary)
    }
}
