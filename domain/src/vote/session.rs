//! Single-active-vote state machine
//!
//! ```text
//!            start_vote
//!   ┌──────┐ ─────────────> ┌────────┐
//!   │ Idle │                │ Active │ <── cast_ballot
//!   └──────┘ <───────────── └────────┘
//!            finalize_vote (manual | timer)
//!            reset (clear_all)
//! ```
//!
//! There is no terminal state. Finalize on `Idle` is rejected with
//! [`SessionError::NoActiveVote`], which is what makes a racing manual
//! finalize and auto-close produce exactly one result.

use super::choice::{Choice, VoteRules};
use super::outcome::VoteReport;
use super::tally::Tally;
use crate::core::error::SessionError;
use crate::core::identity::{CHAIR, Caller};
use crate::document::entities::{DocumentDraft, DocumentEntry, DocumentId, DocumentKind};
use crate::document::ledger::DocumentLedger;
use crate::roster::EligibleRoster;
use crate::session::snapshot::VoteStatus;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Cancellation handle of a running auto-close timer
///
/// Owned exclusively by [`VoteSession`]. Cancelling is best-effort: a timer
/// that already fired will still call back, and is rejected by the
/// finalize guard.
pub trait AutoCloseHandle: Send {
    fn cancel(&self);
}

/// Sequence number of a vote, bumped on every `start_vote`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteRound(u64);

impl VoteRound {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VoteRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What asked for a vote to close
#[derive(Debug, Clone, Copy)]
pub enum FinalizeTrigger<'a> {
    /// Moderator command
    Manual(&'a Caller),
    /// Auto-close timer bound to the given round
    Timer(VoteRound),
}

impl FinalizeTrigger<'_> {
    pub fn close_reason(&self) -> CloseReason {
        match self {
            FinalizeTrigger::Manual(_) => CloseReason::Manual,
            FinalizeTrigger::Timer(_) => CloseReason::AutoClose,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Manual,
    AutoClose,
}

/// Result of a successful `start_vote`
#[derive(Debug, Clone)]
pub struct VoteOpened {
    pub round: VoteRound,
    pub target: DocumentEntry,
    pub announcement: DocumentEntry,
}

/// Result of a successful `cast_ballot`
#[derive(Debug, Clone, Copy)]
pub struct BallotAccepted {
    pub round: VoteRound,
    pub choice: Choice,
    pub tally: Tally,
}

/// Result of a successful finalize
#[derive(Debug, Clone)]
pub struct VoteClosed {
    pub round: VoteRound,
    pub target_id: DocumentId,
    pub reason: CloseReason,
    pub report: VoteReport,
    pub result_entry: DocumentEntry,
}

struct ActiveVote {
    round: VoteRound,
    target_id: DocumentId,
    target_title: String,
    tally: Tally,
    ballots: HashMap<String, Choice>,
    timer: Option<Box<dyn AutoCloseHandle>>,
}

impl std::fmt::Debug for ActiveVote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveVote")
            .field("round", &self.round)
            .field("target_id", &self.target_id)
            .field("tally", &self.tally)
            .field("ballots", &self.ballots.len())
            .field("timer", &self.timer.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
enum VoteState {
    #[default]
    Idle,
    Active(ActiveVote),
}

/// Lifecycle owner of at most one active vote
#[derive(Debug, Default)]
pub struct VoteSession {
    state: VoteState,
    rules: VoteRules,
    last_round: u64,
    /// Entries that already produced a result and cannot be voted on again
    decided: HashSet<DocumentId>,
}

impl VoteSession {
    pub fn new(rules: VoteRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &VoteRules {
        &self.rules
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoteState::Active(_))
    }

    pub fn current_round(&self) -> Option<VoteRound> {
        self.active().map(|v| v.round)
    }

    pub fn target_id(&self) -> Option<DocumentId> {
        self.active().map(|v| v.target_id)
    }

    pub fn target_title(&self) -> Option<&str> {
        self.active().map(|v| v.target_title.as_str())
    }

    pub fn tally(&self) -> Option<Tally> {
        self.active().map(|v| v.tally)
    }

    pub fn ballot_count(&self) -> usize {
        self.active().map_or(0, |v| v.ballots.len())
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.active()
            .is_some_and(|v| v.ballots.contains_key(voter_id))
    }

    pub fn has_timer(&self) -> bool {
        self.active().is_some_and(|v| v.timer.is_some())
    }

    pub fn is_decided(&self, id: &DocumentId) -> bool {
        self.decided.contains(id)
    }

    /// Public status view for observers
    pub fn status(&self, roster_size: usize) -> VoteStatus {
        match self.active() {
            Some(vote) => VoteStatus {
                active: true,
                round: Some(vote.round),
                target_id: Some(vote.target_id),
                target_title: Some(vote.target_title.clone()),
                tally: Some(vote.tally.summarize(&self.rules, roster_size)),
            },
            None => VoteStatus::idle(),
        }
    }

    /// Open a vote on a resolution or amendment
    ///
    /// `spawn_timer` runs after validation and before any state changes. Its
    /// handle is cancelled if the announcement cannot be recorded.
    pub fn start_vote<F>(
        &mut self,
        ledger: &mut DocumentLedger,
        target_id: &DocumentId,
        requester: &Caller,
        spawn_timer: F,
    ) -> Result<VoteOpened, SessionError>
    where
        F: FnOnce(VoteRound) -> Box<dyn AutoCloseHandle>,
    {
        if !requester.is_moderator() {
            return Err(SessionError::Unauthorized);
        }
        if self.is_active() {
            return Err(SessionError::VoteAlreadyActive);
        }

        let target = ledger
            .get(target_id)
            .filter(|e| e.is_votable() && !self.decided.contains(&e.id))
            .cloned()
            .ok_or(SessionError::InvalidTarget)?;

        // No state changes before the timer handle exists
        let round = VoteRound(self.last_round + 1);
        let timer = spawn_timer(round);

        let announcement = match ledger.append(self.opening_announcement(&target)) {
            Ok(entry) => entry,
            Err(e) => {
                timer.cancel();
                return Err(e);
            }
        };
        self.last_round = round.0;

        self.state = VoteState::Active(ActiveVote {
            round,
            target_id: target.id,
            target_title: target.title.clone(),
            tally: Tally::default(),
            ballots: HashMap::new(),
            timer: Some(timer),
        });

        Ok(VoteOpened {
            round,
            target,
            announcement,
        })
    }

    /// Record one participant's ballot
    ///
    /// The already-voted check and the insert happen in one step on `&mut self`.
    pub fn cast_ballot(
        &mut self,
        requester: &Caller,
        raw_choice: &str,
        roster: &EligibleRoster,
    ) -> Result<BallotAccepted, SessionError> {
        if !requester.is_participant() || !roster.contains(&requester.id) {
            return Err(SessionError::Unauthorized);
        }

        let rules = self.rules;
        let VoteState::Active(vote) = &mut self.state else {
            return Err(SessionError::NoActiveVote);
        };

        match vote.ballots.entry(requester.id.clone()) {
            Entry::Occupied(_) => Err(SessionError::AlreadyVoted),
            Entry::Vacant(slot) => {
                let choice = rules.parse_choice(raw_choice)?;
                slot.insert(choice);
                vote.tally.record(choice);
                Ok(BallotAccepted {
                    round: vote.round,
                    choice,
                    tally: vote.tally,
                })
            }
        }
    }

    /// Close the active vote and append its `vote_result` entry
    pub fn finalize(
        &mut self,
        ledger: &mut DocumentLedger,
        trigger: FinalizeTrigger<'_>,
        roster: &EligibleRoster,
    ) -> Result<VoteClosed, SessionError> {
        if let FinalizeTrigger::Manual(caller) = trigger
            && !caller.is_moderator()
        {
            return Err(SessionError::Unauthorized);
        }

        let vote = self.active().ok_or(SessionError::NoActiveVote)?;
        if let FinalizeTrigger::Timer(round) = trigger
            && round != vote.round
        {
            return Err(SessionError::NoActiveVote);
        }

        let report = VoteReport::new(
            vote.target_title.clone(),
            vote.tally,
            &self.rules,
            roster.len(),
            roster.non_voters(vote.ballots.keys()),
        );
        let result_entry = ledger.append(report.to_draft(&self.rules))?;

        let VoteState::Active(vote) = std::mem::take(&mut self.state) else {
            return Err(SessionError::NoActiveVote);
        };
        if let (FinalizeTrigger::Manual(_), Some(timer)) = (trigger, &vote.timer) {
            timer.cancel();
        }
        self.decided.insert(vote.target_id);

        Ok(VoteClosed {
            round: vote.round,
            target_id: vote.target_id,
            reason: trigger.close_reason(),
            report,
            result_entry,
        })
    }

    /// Force the session back to `Idle`, cancelling any timer
    ///
    /// Used together with a ledger clear, so decided targets are forgotten
    /// too. Returns the round that was interrupted, if any.
    pub fn reset(&mut self) -> Option<VoteRound> {
        self.decided.clear();
        match std::mem::take(&mut self.state) {
            VoteState::Active(vote) => {
                if let Some(timer) = &vote.timer {
                    timer.cancel();
                }
                Some(vote.round)
            }
            VoteState::Idle => None,
        }
    }

    fn active(&self) -> Option<&ActiveVote> {
        match &self.state {
            VoteState::Active(vote) => Some(vote),
            VoteState::Idle => None,
        }
    }

    fn opening_announcement(&self, target: &DocumentEntry) -> DocumentDraft {
        let choices = self
            .rules
            .allowed_choices()
            .iter()
            .map(|c| c.as_str().to_uppercase())
            .collect::<Vec<_>>()
            .join("/");

        DocumentDraft::new(
            DocumentKind::Announcement,
            "VOTE STARTED",
            format!(
                "A formal vote is now open on the {}: {}. All delegates must cast their vote ({}).",
                target.kind.as_str().to_uppercase(),
                target.title,
                choices
            ),
            CHAIR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::outcome::VoteOutcome;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHandle {
        cancels: Arc<AtomicUsize>,
    }

    impl AutoCloseHandle for CountingHandle {
        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn no_timer(_: VoteRound) -> Box<dyn AutoCloseHandle> {
        Box::new(CountingHandle::default())
    }

    fn roster() -> EligibleRoster {
        EligibleRoster::new(["FRANCE", "ISRAEL", "AUSTRALIA", "INDIA", "CHINA", "BRAZIL"])
    }

    fn setup() -> (VoteSession, DocumentLedger, DocumentId) {
        let mut ledger = DocumentLedger::new();
        let target = ledger
            .append(DocumentDraft::new(
                DocumentKind::Resolution,
                "Ocean Protection",
                "Preamble",
                "FRANCE",
            ))
            .unwrap();
        (VoteSession::default(), ledger, target.id)
    }

    fn started() -> (VoteSession, DocumentLedger, DocumentId) {
        let (mut session, mut ledger, id) = setup();
        session
            .start_vote(&mut ledger, &id, &Caller::moderator(), no_timer)
            .unwrap();
        (session, ledger, id)
    }

    #[test]
    fn test_start_vote_appends_announcement() {
        let (mut session, mut ledger, id) = setup();
        let opened = session
            .start_vote(&mut ledger, &id, &Caller::moderator(), no_timer)
            .unwrap();

        assert!(session.is_active());
        assert_eq!(session.target_id(), Some(id));
        assert_eq!(opened.round, VoteRound::new(1));
        assert_eq!(opened.announcement.kind, DocumentKind::Announcement);
        assert_eq!(opened.announcement.author, CHAIR);
        assert!(
            opened
                .announcement
                .body
                .contains("RESOLUTION: Ocean Protection")
        );
        assert!(opened.announcement.body.contains("(YAY/NAY/ABSTAIN)"));
        assert_eq!(ledger.len(), 2);
        assert!(session.has_timer());
    }

    #[test]
    fn test_start_vote_requires_moderator() {
        let (mut session, mut ledger, id) = setup();
        let result = session.start_vote(&mut ledger, &id, &Caller::participant("FRANCE"), no_timer);
        assert!(matches!(result, Err(SessionError::Unauthorized)));
        assert!(!session.is_active());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_start_vote_rejects_non_votable_target() {
        let (mut session, mut ledger, _) = setup();
        let announcement = ledger
            .append(DocumentDraft::new(DocumentKind::Announcement, "Recess", "", CHAIR))
            .unwrap();

        let result = session.start_vote(&mut ledger, &announcement.id, &Caller::moderator(), no_timer);
        assert!(matches!(result, Err(SessionError::InvalidTarget)));

        let unknown = DocumentId::new();
        let result = session.start_vote(&mut ledger, &unknown, &Caller::moderator(), no_timer);
        assert!(matches!(result, Err(SessionError::InvalidTarget)));
    }

    #[test]
    fn test_start_vote_while_active_keeps_tally() {
        let (mut session, mut ledger, id) = started();
        session
            .cast_ballot(&Caller::participant("FRANCE"), "yay", &roster())
            .unwrap();

        let mut spawned = false;
        let result = session.start_vote(&mut ledger, &id, &Caller::moderator(), |round| {
            spawned = true;
            no_timer(round)
        });

        assert!(matches!(result, Err(SessionError::VoteAlreadyActive)));
        assert!(!spawned);
        assert_eq!(session.tally().unwrap().yay, 1);
        assert_eq!(session.current_round(), Some(VoteRound::new(1)));
    }

    #[test]
    fn test_cast_ballot_only_once() {
        let (mut session, _, _) = started();
        let voter = Caller::participant("INDIA");

        assert!(session.cast_ballot(&voter, "nay", &roster()).is_ok());
        for choice in ["nay", "yay", "abstain"] {
            assert!(matches!(
                session.cast_ballot(&voter, choice, &roster()),
                Err(SessionError::AlreadyVoted)
            ));
        }
        assert_eq!(session.tally().unwrap().total(), 1);
        assert_eq!(session.ballot_count(), 1);
        assert!(session.has_voted("INDIA"));
    }

    #[test]
    fn test_cast_ballot_rejections() {
        let (mut idle, _, _) = setup();
        assert!(matches!(
            idle.cast_ballot(&Caller::participant("FRANCE"), "yay", &roster()),
            Err(SessionError::NoActiveVote)
        ));

        let (mut session, _, _) = started();
        assert!(matches!(
            session.cast_ballot(&Caller::participant("FRANCE"), "perhaps", &roster()),
            Err(SessionError::InvalidChoice)
        ));
        assert!(matches!(
            session.cast_ballot(&Caller::moderator(), "yay", &roster()),
            Err(SessionError::Unauthorized)
        ));
        assert!(matches!(
            session.cast_ballot(&Caller::participant("ATLANTIS"), "yay", &roster()),
            Err(SessionError::Unauthorized)
        ));
        assert_eq!(session.ballot_count(), 0);
        // An invalid choice does not burn the voter's ballot
        assert!(
            session
                .cast_ballot(&Caller::participant("FRANCE"), "yay", &roster())
                .is_ok()
        );
    }

    #[test]
    fn test_finalize_round_trip() {
        let (mut session, mut ledger, id) = started();
        for (voter, choice) in [
            ("FRANCE", "yay"),
            ("ISRAEL", "yay"),
            ("AUSTRALIA", "yay"),
            ("INDIA", "nay"),
            ("CHINA", "nay"),
        ] {
            session
                .cast_ballot(&Caller::participant(voter), choice, &roster())
                .unwrap();
        }

        let closed = session
            .finalize(&mut ledger, FinalizeTrigger::Manual(&Caller::moderator()), &roster())
            .unwrap();

        assert_eq!(closed.report.outcome, VoteOutcome::Passed);
        assert_eq!(closed.report.ballots_cast, 5);
        assert_eq!(closed.report.tally.total(), 5);
        assert_eq!(closed.report.non_voters, vec!["BRAZIL"]);
        assert_eq!(closed.result_entry.kind, DocumentKind::VoteResult);
        assert_eq!(closed.reason, CloseReason::Manual);
        assert!(!session.is_active());
        assert!(session.is_decided(&id));
        assert_eq!(ledger.snapshot_newest_first()[0].id, closed.result_entry.id);
    }

    #[test]
    fn test_second_finalize_is_no_active_vote() {
        let (mut session, mut ledger, _) = started();
        let round = session.current_round().unwrap();

        session
            .finalize(&mut ledger, FinalizeTrigger::Manual(&Caller::moderator()), &roster())
            .unwrap();
        let late_timer = session.finalize(&mut ledger, FinalizeTrigger::Timer(round), &roster());

        assert!(matches!(late_timer, Err(SessionError::NoActiveVote)));
        let results = ledger
            .snapshot_newest_first()
            .iter()
            .filter(|e| e.kind == DocumentKind::VoteResult)
            .count();
        assert_eq!(results, 1);
    }

    #[test]
    fn test_manual_finalize_cancels_timer() {
        let (mut session, mut ledger, id) = setup();
        let cancels = Arc::new(AtomicUsize::new(0));
        let handle_cancels = Arc::clone(&cancels);
        session
            .start_vote(&mut ledger, &id, &Caller::moderator(), move |_| {
                Box::new(CountingHandle {
                    cancels: handle_cancels,
                })
            })
            .unwrap();

        session
            .finalize(&mut ledger, FinalizeTrigger::Manual(&Caller::moderator()), &roster())
            .unwrap();
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_manual_finalize_requires_moderator() {
        let (mut session, mut ledger, _) = started();
        let result = session.finalize(
            &mut ledger,
            FinalizeTrigger::Manual(&Caller::participant("FRANCE")),
            &roster(),
        );
        assert!(matches!(result, Err(SessionError::Unauthorized)));
        assert!(session.is_active());
    }

    #[test]
    fn test_stale_timer_round_is_ignored() {
        let (mut session, mut ledger, _) = started();
        session.reset();

        let second = ledger
            .append(DocumentDraft::new(DocumentKind::Amendment, "Clause 2", "Strike", "INDIA"))
            .unwrap();
        session
            .start_vote(&mut ledger, &second.id, &Caller::moderator(), no_timer)
            .unwrap();

        let stale = session.finalize(&mut ledger, FinalizeTrigger::Timer(VoteRound::new(1)), &roster());
        assert!(matches!(stale, Err(SessionError::NoActiveVote)));
        assert!(session.is_active());

        let fresh = session.finalize(&mut ledger, FinalizeTrigger::Timer(VoteRound::new(2)), &roster());
        assert_eq!(fresh.unwrap().reason, CloseReason::AutoClose);
    }

    #[test]
    fn test_decided_target_cannot_be_reopened() {
        let (mut session, mut ledger, id) = started();
        session
            .finalize(&mut ledger, FinalizeTrigger::Manual(&Caller::moderator()), &roster())
            .unwrap();

        let again = session.start_vote(&mut ledger, &id, &Caller::moderator(), no_timer);
        assert!(matches!(again, Err(SessionError::InvalidTarget)));
    }

    #[test]
    fn test_reset_cancels_and_returns_round() {
        let (mut idle, _, _) = setup();
        assert_eq!(idle.reset(), None);

        let (mut session, mut ledger, id) = setup();
        let cancels = Arc::new(AtomicUsize::new(0));
        let handle_cancels = Arc::clone(&cancels);
        session
            .start_vote(&mut ledger, &id, &Caller::moderator(), move |_| {
                Box::new(CountingHandle {
                    cancels: handle_cancels,
                })
            })
            .unwrap();

        assert_eq!(session.reset(), Some(VoteRound::new(1)));
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert!(!session.is_active());
        assert_eq!(session.status(6), VoteStatus::idle());
    }

    #[test]
    fn test_failed_timer_spawn_leaves_state_untouched() {
        let (mut session, mut ledger, id) = setup();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            session.start_vote(&mut ledger, &id, &Caller::moderator(), |_| {
                panic!("no runtime")
            })
        }));
        assert!(result.is_err());
        assert!(!session.is_active());
        assert_eq!(ledger.len(), 1);

        let opened = session
            .start_vote(&mut ledger, &id, &Caller::moderator(), no_timer)
            .unwrap();
        assert_eq!(opened.round, VoteRound::new(1));
        assert_eq!(ledger.len(), 2);
    }
}
