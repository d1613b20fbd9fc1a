//! Session parameters fixed at startup.
//!
//! [`SessionConfig`] is built by the infrastructure config loader (or by
//! tests directly) and handed to
//! [`SessionCoordinator`](crate::use_cases::session_coordinator::SessionCoordinator).

use plenary_domain::VoteRules;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a vote stays open before auto-close finalizes it.
    pub auto_close: Duration,
    /// Abstain handling for ballots and displayed totals.
    pub rules: VoteRules,
    /// Events buffered per observer before a slow observer starts lagging.
    pub observer_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_close: Duration::from_secs(30),
            rules: VoteRules::default(),
            observer_buffer: 64,
        }
    }
}

impl SessionConfig {
    // ==================== Builder Methods ====================

    pub fn with_auto_close(mut self, duration: Duration) -> Self {
        self.auto_close = duration;
        self
    }

    pub fn with_allow_abstain(mut self, allow: bool) -> Self {
        self.rules.allow_abstain = allow;
        self
    }

    pub fn with_count_abstain_in_total(mut self, count: bool) -> Self {
        self.rules.count_abstain_in_total = count;
        self
    }

    pub fn with_observer_buffer(mut self, capacity: usize) -> Self {
        self.observer_buffer = capacity.max(1);
        self
    }
}
