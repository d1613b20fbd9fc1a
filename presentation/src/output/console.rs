//! Console output formatter for session traffic

use crate::output::formatter::OutputFormatter;
use crate::script::{QueryResult, ScriptSummary, StepReport};
use colored::Colorize;
use plenary_domain::{
    ActionOutcome, Caller, CallerVoteStatus, DocumentEntry, DocumentKind, ObserverEvent,
    SessionSnapshot, VoteStatus,
};

/// Formats session traffic for a terminal
pub struct ConsoleFormatter {
    /// Print the full board on every `snapshot_update` instead of a one-liner
    full_snapshots: bool,
}

impl ConsoleFormatter {
    pub fn new(full_snapshots: bool) -> Self {
        Self { full_snapshots }
    }

    /// Format the whole session board
    pub fn format_board(snapshot: &SessionSnapshot) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Session Board (v{})", snapshot.version)));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Vote:".cyan().bold(),
            Self::vote_line(&snapshot.vote_status)
        ));

        output.push_str(&Self::section_header("Documents (newest first)"));
        if snapshot.documents.is_empty() {
            output.push_str(&format!("{}\n", "(no documents)".dimmed()));
        }
        for entry in &snapshot.documents {
            output.push_str(&Self::entry(entry));
        }

        output.push_str(&Self::footer());
        output
    }

    fn entry(entry: &DocumentEntry) -> String {
        let label = format!("[{}]", entry.kind.label());
        let label = match entry.kind {
            DocumentKind::Resolution | DocumentKind::Amendment => label.yellow().bold(),
            DocumentKind::Announcement => label.blue().bold(),
            DocumentKind::VoteResult => label.green().bold(),
        };

        let mut output = format!(
            "\n{} {} {}\n",
            label,
            entry.title.bold(),
            format!(
                "({}, {})",
                entry.author,
                entry.created_at.format("%H:%M:%S")
            )
            .dimmed()
        );
        if !entry.body.is_empty() {
            output.push_str(&Self::indent(entry.body.trim_end(), "    "));
            output.push('\n');
        }
        output
    }

    fn vote_line(status: &VoteStatus) -> String {
        match (&status.target_title, &status.tally) {
            (Some(title), Some(tally)) if status.active => format!(
                "OPEN on \"{}\", {} of {} voted",
                title, tally.voter_count, tally.total_eligible
            ),
            _ => "no vote in progress".to_string(),
        }
    }

    fn caller_vote_line(status: &CallerVoteStatus) -> String {
        match (&status.target_title, &status.tally) {
            (Some(title), Some(tally)) if status.active => format!(
                "OPEN on \"{}\", {} of {} voted, you have {}",
                title,
                tally.voter_count,
                tally.total_eligible,
                if status.has_voted { "voted" } else { "not voted" }
            ),
            _ => "no vote in progress".to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_step(&self, report: &StepReport) -> String {
        let prefix = format!("[{}] {} {}", report.line, report.caller.id, report.action);
        match &report.result {
            Ok(ActionOutcome::Created { id }) => {
                format!("{} {} {}", prefix, "ok".green().bold(), format!("(id {})", id).dimmed())
            }
            Ok(ActionOutcome::Ack) => format!("{} {}", prefix, "ok".green().bold()),
            Err(e) if e.is_unauthorized() => {
                format!("{} {}: {}", prefix, "denied".red().bold(), e)
            }
            Err(e) => format!("{} {}: {}", prefix, "rejected".yellow().bold(), e),
        }
    }

    fn format_query(&self, line: usize, caller: &Caller, result: &QueryResult) -> String {
        let prefix = format!("[{}] {}", line, caller.id);
        match result {
            QueryResult::VoteStatus(status) => format!(
                "{} {} {}",
                prefix,
                "vote_status:".cyan(),
                Self::caller_vote_line(status)
            ),
            QueryResult::ListVotable(entries) => {
                let mut output = format!("{} {} {}", prefix, "list_votable:".cyan(), entries.len());
                for entry in entries {
                    output.push_str(&format!(
                        "\n    {} {} {}",
                        entry.kind.label().yellow(),
                        entry.title,
                        format!("({})", entry.id).dimmed()
                    ));
                }
                output
            }
            QueryResult::Snapshot(snapshot) => {
                format!("{} {}\n{}", prefix, "snapshot:".cyan(), Self::format_board(snapshot))
            }
        }
    }

    fn format_event(&self, event: &ObserverEvent) -> Option<String> {
        let line = match event {
            ObserverEvent::SnapshotUpdate(snapshot) if self.full_snapshots => {
                Self::format_board(snapshot)
            }
            ObserverEvent::SnapshotUpdate(snapshot) => format!(
                "    {} v{}: {} documents, {}",
                "snapshot".dimmed(),
                snapshot.version,
                snapshot.documents.len(),
                Self::vote_line(&snapshot.vote_status)
            ),
            ObserverEvent::VoteTallyDelta {
                voter_count,
                total_eligible,
            } => format!(
                "    {} {} of {} voted",
                "ballot received:".magenta(),
                voter_count,
                total_eligible
            ),
            ObserverEvent::VoteStarted { target_title } => format!(
                "    {} \"{}\"",
                "VOTE STARTED on".green().bold(),
                target_title
            ),
            ObserverEvent::VoteEnded => format!("    {}", "VOTE ENDED".green().bold()),
        };
        Some(line)
    }

    fn format_snapshot(&self, snapshot: &SessionSnapshot) -> String {
        Self::format_board(snapshot)
    }

    fn format_summary(&self, summary: &ScriptSummary) -> String {
        format!(
            "{} {} actions ({} accepted, {} rejected), {} queries",
            "Done:".cyan().bold(),
            summary.actions,
            summary.accepted,
            summary.rejected,
            summary.queries
        )
    }
}
