//! Roster-backed identity resolution
//!
//! Names are trimmed and uppercased. The chair code signs in as the
//! moderator (acting as `CHAIR`), roster members as participants, and
//! anything else resolves to an unknown caller.

use plenary_application::IdentityResolver;
use plenary_domain::{Caller, EligibleRoster};

pub struct RosterIdentityResolver {
    chair_code: String,
    roster: EligibleRoster,
}

impl RosterIdentityResolver {
    pub fn new(chair_code: &str, roster: EligibleRoster) -> Self {
        Self {
            chair_code: chair_code.trim().to_uppercase(),
            roster,
        }
    }
}

impl IdentityResolver for RosterIdentityResolver {
    fn resolve(&self, name: &str) -> Caller {
        let name = name.trim().to_uppercase();
        if !self.chair_code.is_empty() && name == self.chair_code {
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
