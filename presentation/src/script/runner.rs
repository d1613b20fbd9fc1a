//! JSON-lines action script runner
//!
//! Stands in for a network transport: each line names a caller, the
//! caller is resolved through the [`IdentityResolver`] port, and the
//! action goes to the [`SessionCoordinator`]. The runner is also an
//! observer, so every event the session publishes is printed after the
//! step that caused it.

use super::step::{QueryResult, ScriptQuery, ScriptStep, ScriptSummary, StepReport};
use crate::output::OutputFormatter;
use plenary_application::{IdentityResolver, ObserverSubscription, SessionCoordinator};
use plenary_domain::{Caller, DocumentId, ObserverEvent, SessionAction};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub struct ScriptRunner {
    session: SessionCoordinator,
    identity: Arc<dyn IdentityResolver>,
    formatter: Box<dyn OutputFormatter>,
    settle: bool,
}

impl ScriptRunner {
    pub fn new(
        session: SessionCoordinator,
        identity: Arc<dyn IdentityResolver>,
        formatter: Box<dyn OutputFormatter>,
    ) -> Self {
        Self {
            session,
            identity,
            formatter,
            settle: false,
        }
    }

    /// Wait for an open vote to auto-close once the input is exhausted
    pub fn with_settle(mut self, settle: bool) -> Self {
        self.settle = settle;
        self
    }

    /// Run a script file, or stdin when `path` is `None` or `-`
    pub async fn run_path<W: Write>(
        &self,
        path: Option<&Path>,
        out: &mut W,
    ) -> Result<ScriptSummary, ScriptError> {
        match path.filter(|p| p.as_os_str() != "-") {
            Some(path) => {
                info!("Running script {}", path.display());
                let file = tokio::fs::File::open(path).await?;
                self.run(BufReader::new(file), out).await
            }
            None => {
                info!("Reading script from stdin");
                self.run(BufReader::new(tokio::io::stdin()), out).await
            }
        }
    }

    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<ScriptSummary, ScriptError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut observer = self.session.subscribe();
        writeln!(out, "{}", self.formatter.format_snapshot(&observer.initial))?;

        let mut summary = ScriptSummary::default();
        let mut lines = input.lines();
        let mut line_no = 0;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let step = ScriptStep::parse(&line)
                .map_err(|source| ScriptError::Parse {
                    line: line_no,
                    source,
                })?;
            let Some(step) = step else {
                continue;
            };

            match step {
                ScriptStep::Wait(duration) => {
                    debug!("Waiting {:?}", duration);
                    tokio::time::sleep(duration).await;
                }
                ScriptStep::Query { caller, query } => {
                    let caller = self.identity.resolve(&caller);
                    let result = self.query(&caller, query);
                    summary.queries += 1;
                    writeln!(
                        out,
                        "{}",
                        self.formatter.format_query(line_no, &caller, &result)
                    )?;
                }
                ScriptStep::Action { caller, action } => {
                    let caller = self.identity.resolve(&caller);
                    let report = self.execute(line_no, caller, action);
                    summary.record(&report);
                    writeln!(out, "{}", self.formatter.format_step(&report))?;
                }
                ScriptStep::StartVoteByTitle { caller, title } => {
                    let caller = self.identity.resolve(&caller);
                    let target_id = self.find_votable(&title);
                    let report = self.execute(line_no, caller, SessionAction::StartVote { target_id });
                    summary.record(&report);
                    writeln!(out, "{}", self.formatter.format_step(&report))?;
                }
            }

            self.flush_events(&mut observer, out)?;
        }

        if self.settle {
            self.settle_open_vote(&mut observer, out).await?;
        }

        writeln!(out, "{}", self.formatter.format_snapshot(&self.session.snapshot()))?;
        writeln!(out, "{}", self.formatter.format_summary(&summary))?;
        Ok(summary)
    }

    fn execute(&self, line: usize, caller: Caller, action: SessionAction) -> StepReport {
        let name = action.name();
        let result = self.session.dispatch(&caller, action);
        StepReport {
            line,
            caller,
            action: name,
            result,
        }
    }

    fn query(&self, caller: &Caller, query: ScriptQuery) -> QueryResult {
        match query {
            ScriptQuery::VoteStatus => QueryResult::VoteStatus(self.session.vote_status(caller)),
            ScriptQuery::ListVotable => QueryResult::ListVotable(self.session.list_votable()),
            ScriptQuery::Snapshot => QueryResult::Snapshot(self.session.snapshot()),
        }
    }

    /// Newest votable entry with this title
    ///
    /// An unmatched title maps to a fresh id, which the session rejects
    /// with the same checks as any other unknown target.
    fn find_votable(&self, title: &str) -> DocumentId {
        self.session
            .list_votable()
            .into_iter()
            .find(|entry| entry.title == title.trim())
            .map(|entry| entry.id)
            .unwrap_or_default()
    }

    fn flush_events<W: Write>(
        &self,
        observer: &mut ObserverSubscription,
        out: &mut W,
    ) -> std::io::Result<()> {
        for event in observer.drain() {
            self.write_event(&event, out)?;
        }
        Ok(())
    }

    fn write_event<W: Write>(&self, event: &ObserverEvent, out: &mut W) -> std::io::Result<()> {
        if let Some(line) = self.formatter.format_event(event) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    async fn settle_open_vote<W: Write>(
        &self,
        observer: &mut ObserverSubscription,
        out: &mut W,
    ) -> std::io::Result<()> {
        if !self.session.snapshot().vote_status.active {
            return Ok(());
        }

        let limit = self.session.config().auto_close + Duration::from_secs(1);
        info!("Waiting up to {:?} for the open vote to close", limit);

        let waited = tokio::time::timeout(limit, async {
            while let Some(event) = observer.next().await {
                self.write_event(&event, out)?;
                if event == ObserverEvent::VoteEnded {
                    break;
                }
            }
            Ok::<(), std::io::Error>(())
        })
        .await;

        match waited {
            Ok(result) => result,
            Err(_) => {
                warn!("Open vote did not close within {:?}", limit);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::JsonFormatter;
    use plenary_application::SessionConfig;
    use plenary_domain::EligibleRoster;
    use serde_json::Value;

    struct TestResolver {
        roster: EligibleRoster,
    }

    impl IdentityResolver for TestResolver {
        fn resolve(&self, name: &str) -> Caller {
            let name = name.trim().to_uppercase();
            if name == "ADMIN" {
                Caller::moderator()
            } else if self.roster.contains(&name) {
                Caller::participant(name)
            } else {
                Caller::unknown(name)
            }
        }

        fn roster(&self) -> &EligibleRoster {
            &self.roster
        }
    }

    fn runner() -> ScriptRunner {
        let roster = EligibleRoster::new(["FRANCE", "INDIA", "CHINA"]);
        let session = SessionCoordinator::new(SessionConfig::default(), roster.clone());
        ScriptRunner::new(
            session,
            Arc::new(TestResolver { roster }),
            Box::new(JsonFormatter),
        )
    }

    async fn run(runner: &ScriptRunner, script: &str) -> (ScriptSummary, Vec<Value>) {
        let mut out = Vec::new();
        let summary = runner.run(script.as_bytes(), &mut out).await.unwrap();
        let records = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, records)
    }

    fn of_type<'a>(records: &'a [Value], kind: &str) -> Vec<&'a Value> {
        records.iter().filter(|r| r["type"] == kind).collect()
    }

    const SESSION_SCRIPT: &str = r#"
# one full vote
{"caller": "france", "action": "submit_document", "kind": "resolution", "title": "Ocean", "body": "Protect reefs"}
{"caller": "ADMIN", "action": "start_vote", "target": "Ocean"}
{"caller": "france", "action": "cast_ballot", "choice": "yay"}
{"caller": "france", "action": "cast_ballot", "choice": "nay"}
{"caller": "narnia", "action": "cast_ballot", "choice": "yay"}
{"caller": "india", "action": "cast_ballot", "choice": "yay"}
{"caller": "india", "query": "vote_status"}
{"caller": "ADMIN", "action": "finalize_vote"}
"#;

    #[tokio::test]
    async fn test_full_vote_script() {
        let runner = runner();
        let (summary, records) = run(&runner, SESSION_SCRIPT).await;

        assert_eq!(summary.actions, 7);
        assert_eq!(summary.accepted, 5);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.queries, 1);

        let steps = of_type(&records, "step");
        assert_eq!(steps[3]["error"]["code"], "already_voted");
        assert_eq!(steps[4]["error"]["code"], "unauthorized");
        assert_eq!(steps[4]["role"], "unknown");

        let query = of_type(&records, "query")[0];
        assert_eq!(query["result"]["has_voted"], true);
        assert_eq!(query["result"]["tally"]["voter_count"], 2);

        let events: Vec<_> = of_type(&records, "event")
            .into_iter()
            .map(|e| e["event"].as_str().unwrap().to_string())
            .collect();
        assert!(events.contains(&"vote_started".to_string()));
        assert_eq!(events.last().map(String::as_str), Some("vote_ended"));

        let snapshot = runner.session.snapshot();
        assert!(!snapshot.vote_status.active);
        assert!(snapshot.documents[0].body.contains("Result: PASSED"));
    }

    #[tokio::test]
    async fn test_unknown_title_is_invalid_target() {
        let runner = runner();
        let (summary, records) = run(
            &runner,
            r#"{"caller": "ADMIN", "action": "start_vote", "target": "Nothing"}"#,
        )
        .await;
        assert_eq!(summary.rejected, 1);
        assert_eq!(of_type(&records, "step")[0]["error"]["code"], "invalid_target");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_lets_auto_close_fire() {
        let runner = runner();
        let script = r#"
{"caller": "china", "action": "submit_document", "kind": "amendment", "title": "Clause 4", "body": "Insert"}
{"caller": "ADMIN", "action": "start_vote", "target": "Clause 4"}
{"caller": "china", "action": "cast_ballot", "choice": "nay"}
{"wait_secs": 31}
{"caller": "china", "query": "vote_status"}
"#;
        let (_, records) = run(&runner, script).await;

        assert!(
            of_type(&records, "event")
                .iter()
                .any(|e| e["event"] == "vote_ended")
        );
        assert_eq!(of_type(&records, "query")[0]["result"]["active"], false);
        assert!(
            runner.session.snapshot().documents[0]
                .body
                .contains("Result: FAILED")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_open_vote() {
        let runner = runner().with_settle(true);
        let script = r#"
{"caller": "india", "action": "submit_document", "kind": "resolution", "title": "Trade", "body": "Lower tariffs"}
{"caller": "ADMIN", "action": "start_vote", "target": "Trade"}
"#;
        let (_, records) = run(&runner, script).await;

        assert!(!runner.session.snapshot().vote_status.active);
        let last_snapshot = of_type(&records, "snapshot").pop().unwrap();
        assert_eq!(last_snapshot["vote_status"]["active"], false);
    }

    #[tokio::test]
    async fn test_malformed_line_aborts_with_line_number() {
        let runner = runner();
        let mut out = Vec::new();
        let script = "{\"caller\": \"ADMIN\", \"action\": \"clear_all\"}\n{oops\n";
        let err = runner.run(script.as_bytes(), &mut out).await.unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));
    }
}
