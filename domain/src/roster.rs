//! Eligible roster value object

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fixed ordered set of participant identifiers eligible to vote
///
/// Supplied by the identity collaborator and read-only to the core.
/// Duplicates are dropped, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct EligibleRoster {
    members: Vec<String>,
}

impl EligibleRoster {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let members = members
            .into_iter()
            .map(Into::into)
            .filter(|m| seen.insert(m.clone()))
            .collect();
        Self { members }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members not in `voted`, sorted by identifier
    pub fn non_voters<'a, I>(&self, voted: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let voted: HashSet<&String> = voted.into_iter().collect();
        let mut missing: Vec<String> = self
            .members
            .iter()
            .filter(|m| !voted.contains(m))
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

impl From<Vec<String>> for EligibleRoster {
    fn from(members: Vec<String>) -> Self {
        Self::new(members)
    }
}

impl From<EligibleRoster> for Vec<String> {
    fn from(roster: EligibleRoster) -> Self {
        roster.members
    }
}
