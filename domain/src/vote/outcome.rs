//! Vote outcome and the published result report

use super::choice::VoteRules;
use super::tally::Tally;
use crate::core::identity::CHAIR;
use crate::document::entities::{DocumentDraft, DocumentKind};
use serde::{Deserialize, Serialize};

/// Outcome of a finalized vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteOutcome {
    Passed,
    Failed,
}

impl VoteOutcome {
    /// Strict majority of yay over nay; ties fail, abstentions never count
    pub fn from_tally(tally: &Tally) -> Self {
        if tally.yay > tally.nay {
            VoteOutcome::Passed
        } else {
            VoteOutcome::Failed
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, VoteOutcome::Passed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOutcome::Passed => "PASSED",
            VoteOutcome::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything published about a closed vote
///
/// Carries counts and the roster members who did not vote, never individual
/// ballots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReport {
    pub target_title: String,
    pub outcome: VoteOutcome,
    pub tally: Tally,
    pub ballots_cast: usize,
    pub votes_counted: usize,
    pub total_eligible: usize,
    pub non_voters: Vec<String>,
}

impl VoteReport {
    pub fn new(
        target_title: impl Into<String>,
        tally: Tally,
        rules: &VoteRules,
        roster_size: usize,
        non_voters: Vec<String>,
    ) -> Self {
        let summary = tally.summarize(rules, roster_size);
        Self {
            target_title: target_title.into(),
            outcome: VoteOutcome::from_tally(&tally),
            tally,
            ballots_cast: tally.total(),
            votes_counted: summary.voter_count,
            total_eligible: summary.total_eligible,
            non_voters,
        }
    }

    pub fn title(&self) -> String {
        format!("VOTE RESULT: {}", self.target_title)
    }

    pub fn render_body(&self, rules: &VoteRules) -> String {
        let verdict = if self.outcome.is_passed() {
            "Passed"
        } else {
            "Failed"
        };

        let mut body = format!(
            "VOTE ON: {}\n--- FINAL RESULT ---\nResult: {} ({} by simple majority)\n\n",
            self.target_title, self.outcome, verdict
        );
        body.push_str(&format!("Yay Votes: {}\n", self.tally.yay));
        body.push_str(&format!("Nay Votes: {}\n", self.tally.nay));
        if rules.allow_abstain {
            body.push_str(&format!("Abstain Votes: {}\n", self.tally.abstain));
        }
        body.push_str(&format!(
            "Total Votes Cast: {} out of {} possible votes\n",
            self.votes_counted, self.total_eligible
        ));

        if !self.non_voters.is_empty() {
            body.push_str("\n--- DELEGATES WHO DID NOT VOTE ---\n");
            for name in &self.non_voters {
                body.push_str(&format!("- {}: NOT CAST\n", name));
            }
        }
        body
    }

    /// Ledger draft for the `vote_result` entry
    pub fn to_draft(&self, rules: &VoteRules) -> DocumentDraft {
        DocumentDraft::new(
            DocumentKind::VoteResult,
            self.title(),
            self.render_body(rules),
            CHAIR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(yay: usize, nay: usize, abstain: usize) -> Tally {
        Tally { yay, nay, abstain }
    }

    #[test]
    fn test_majority_passes() {
        assert_eq!(VoteOutcome::from_tally(&tally(3, 2, 1)), VoteOutcome::Passed);
    }

    #[test]
    fn test_tie_fails() {
        assert_eq!(VoteOutcome::from_tally(&tally(2, 2, 0)), VoteOutcome::Failed);
        assert_eq!(VoteOutcome::from_tally(&tally(0, 0, 5)), VoteOutcome::Failed);
    }

    #[test]
    fn test_report_body_lists_counts_and_non_voters() {
        let rules = VoteRules::default();
        let report = VoteReport::new(
            "Climate Accord",
            tally(2, 1, 0),
            &rules,
            5,
            vec!["CHINA".to_string(), "ISRAEL".to_string()],
        );
        let body = report.render_body(&rules);

        assert!(body.contains("VOTE ON: Climate Accord"));
        assert!(body.contains("Result: PASSED (Passed by simple majority)"));
        assert!(body.contains("Yay Votes: 2"));
        assert!(body.contains("Abstain Votes: 0"));
        assert!(body.contains("Total Votes Cast: 3 out of 5 possible votes"));
        assert!(body.contains("- CHINA: NOT CAST\n- ISRAEL: NOT CAST"));
        assert_eq!(report.title(), "VOTE RESULT: Climate Accord");
    }

    #[test]
    fn test_report_without_abstain_omits_line() {
        let rules = VoteRules {
            allow_abstain: false,
            ..VoteRules::default()
        };
        let report = VoteReport::new("X", tally(1, 1, 0), &rules, 2, vec![]);
        let body = report.render_body(&rules);

        assert!(!body.contains("Abstain"));
        assert!(!body.contains("DID NOT VOTE"));
        assert!(body.contains("Result: FAILED"));
    }

    #[test]
    fn test_outcome_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&VoteOutcome::Passed).unwrap(),
            "\"PASSED\""
        );
    }
}
