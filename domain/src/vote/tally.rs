//! Vote tally and its public summary

use super::choice::{Choice, VoteRules};
use serde::{Deserialize, Serialize};

/// Aggregate counts per choice for the active vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub yay: usize,
    pub nay: usize,
    pub abstain: usize,
}

impl Tally {
    pub fn record(&mut self, choice: Choice) {
        match choice {
            Choice::Yay => self.yay += 1,
            Choice::Nay => self.nay += 1,
            Choice::Abstain => self.abstain += 1,
        }
    }

    pub fn count(&self, choice: Choice) -> usize {
        match choice {
            Choice::Yay => self.yay,
            Choice::Nay => self.nay,
            Choice::Abstain => self.abstain,
        }
    }

    /// Number of ballots behind this tally
    pub fn total(&self) -> usize {
        self.yay + self.nay + self.abstain
    }

    /// Counts as shown to observers, with abstentions handled per `rules`
    pub fn summarize(&self, rules: &VoteRules, roster_size: usize) -> TallySummary {
        let (voter_count, total_eligible) = if rules.count_abstain_in_total {
            (self.total(), roster_size)
        } else {
            (
                self.yay + self.nay,
                roster_size.saturating_sub(self.abstain),
            )
        };

        TallySummary {
            yay: self.yay,
            nay: self.nay,
            abstain: self.abstain,
            voter_count,
            total_eligible,
        }
    }
}

/// Public view of a tally (counts only, never who voted what)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TallySummary {
    pub yay: usize,
    pub nay: usize,
    pub abstain: usize,
    pub voter_count: usize,
    pub total_eligible: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(yay: usize, nay: usize, abstain: usize) -> Tally {
        Tally { yay, nay, abstain }
    }

    #[test]
    fn test_record_and_total() {
        let mut t = Tally::default();
        t.record(Choice::Yay);
        t.record(Choice::Yay);
        t.record(Choice::Abstain);

        assert_eq!(t.count(Choice::Yay), 2);
        assert_eq!(t.count(Choice::Nay), 0);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn test_summary_counts_abstain_by_default() {
        let summary = tally(2, 1, 1).summarize(&VoteRules::default(), 5);
        assert_eq!(summary.voter_count, 4);
        assert_eq!(summary.total_eligible, 5);
    }

    #[test]
    fn test_summary_excludes_abstain_when_configured() {
        let rules = VoteRules {
            count_abstain_in_total: false,
            ..VoteRules::default()
        };
        let summary = tally(2, 1, 1).summarize(&rules, 5);
        assert_eq!(summary.voter_count, 3);
        assert_eq!(summary.total_eligible, 4);
        assert_eq!(summary.abstain, 1);
    }
}
