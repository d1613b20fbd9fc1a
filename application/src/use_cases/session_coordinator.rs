//! Session coordinator
//!
//! The single serialization boundary of the session. Every mutating action
//! and every snapshot read takes the same `std::sync::Mutex` over the
//! ledger and the vote session, and no transition awaits while holding it.
//!
//! ```text
//! transport / script ──> SessionCoordinator ──lock──> SessionState
//!                             │                        ├─ DocumentLedger
//! AutoCloseTimer ─auto_close──┘                        └─ VoteSession
//!                             │
//!                             └── BroadcastCoordinator ──> observers
//! ```
//!
//! Observer events are published before the lock is released, which is what
//! keeps delivery order equal to serialization order. Transcript logging
//! happens after the lock is released.

use super::auto_close::AutoCloseTimer;
use super::broadcast::{BroadcastCoordinator, ObserverSubscription};
use crate::config::SessionConfig;
use crate::ports::session_logger::{NoSessionLogger, SessionLogEvent, SessionLogger};
use plenary_domain::{
    ActionOutcome, AutoCloseHandle, Caller, CallerVoteStatus, DocumentDraft, DocumentEntry,
    DocumentId, DocumentKind, DocumentLedger, EligibleRoster, FinalizeTrigger, ObserverEvent, Role,
    SessionAction, SessionError, SessionSnapshot, VoteClosed, VoteRound, VoteSession,
};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, warn};

const ANNOUNCEMENT_TITLE: &str = "CHAIR ANNOUNCEMENT";
const DEFAULT_ANNOUNCEMENT: &str = "Chair made an announcement.";

struct SessionState {
    ledger: DocumentLedger,
    vote: VoteSession,
    version: u64,
}

impl SessionState {
    fn snapshot(&self, roster_size: usize) -> SessionSnapshot {
        SessionSnapshot {
            version: self.version,
            documents: self.ledger.snapshot_newest_first(),
            vote_status: self.vote.status(roster_size),
        }
    }
}

struct Shared {
    state: Mutex<SessionState>,
    broadcast: BroadcastCoordinator,
    roster: EligibleRoster,
    config: SessionConfig,
    logger: Arc<dyn SessionLogger>,
}

/// Owner of the one global session
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionCoordinator {
    shared: Arc<Shared>,
}

impl SessionCoordinator {
    pub fn new(config: SessionConfig, roster: EligibleRoster) -> Self {
        Self::with_logger(config, roster, Arc::new(NoSessionLogger))
    }

    pub fn with_logger(
        config: SessionConfig,
        roster: EligibleRoster,
        logger: Arc<dyn SessionLogger>,
    ) -> Self {
        let state = SessionState {
            ledger: DocumentLedger::new(),
            vote: VoteSession::new(config.rules),
            version: 0,
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                broadcast: BroadcastCoordinator::new(config.observer_buffer),
                roster,
                config,
                logger,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn roster(&self) -> &EligibleRoster {
        &self.shared.roster
    }

    // ==================== Action API ====================

    /// Dispatch a tagged action on behalf of `caller`
    pub fn dispatch(
        &self,
        caller: &Caller,
        action: SessionAction,
    ) -> Result<ActionOutcome, SessionError> {
        match action {
            SessionAction::SubmitDocument { kind, title, body } => self
                .submit_document(caller, kind, title, body)
                .map(|id| ActionOutcome::Created { id }),
            SessionAction::CastBallot { choice } => {
                self.cast_ballot(caller, &choice).map(|_| ActionOutcome::Ack)
            }
            SessionAction::StartVote { target_id } => self
                .start_vote(caller, &target_id)
                .map(|_| ActionOutcome::Ack),
            SessionAction::FinalizeVote => {
                self.finalize_vote(caller).map(|_| ActionOutcome::Ack)
            }
            SessionAction::ClearAll => self.clear_all(caller).map(|_| ActionOutcome::Ack),
            SessionAction::Announce { body } => self
                .announce(caller, body)
                .map(|id| ActionOutcome::Created { id }),
        }
    }

    /// Add a resolution or amendment (the moderator may also post announcements)
    pub fn submit_document(
        &self,
        caller: &Caller,
        kind: DocumentKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<DocumentId, SessionError> {
        let allowed = match caller.role {
            Role::Unknown => Err(SessionError::Unauthorized),
            Role::Participant if !kind.is_votable() => Err(SessionError::Validation(format!(
                "delegates cannot submit {} entries",
                kind
            ))),
            _ if kind == DocumentKind::VoteResult => Err(SessionError::Validation(
                "vote results are produced by closing a vote".to_string(),
            )),
            _ => Ok(()),
        };
        allowed.inspect_err(|e| self.rejected("submit_document", caller, e))?;

        let draft = DocumentDraft::new(kind, title, body, caller.author());
        let entry = self
            .append_and_notify(draft)
            .inspect_err(|e| self.rejected("submit_document", caller, e))?;

        info!("{} submitted {} \"{}\"", entry.author, entry.kind, entry.title);
        self.log_entry("document_submitted", &entry);
        Ok(entry.id)
    }

    /// Post a moderator announcement
    pub fn announce(
        &self,
        caller: &Caller,
        body: impl Into<String>,
    ) -> Result<DocumentId, SessionError> {
        if !caller.is_moderator() {
            let err = SessionError::Unauthorized;
            self.rejected("announce", caller, &err);
            return Err(err);
        }

        let body = body.into();
        let body = if body.trim().is_empty() {
            DEFAULT_ANNOUNCEMENT.to_string()
        } else {
            body
        };

        let draft = DocumentDraft::new(
            DocumentKind::Announcement,
            ANNOUNCEMENT_TITLE,
            body,
            caller.author(),
        );
        let entry = self
            .append_and_notify(draft)
            .inspect_err(|e| self.rejected("announce", caller, e))?;

        info!("Chair announcement posted");
        self.log_entry("announcement", &entry);
        Ok(entry.id)
    }

    /// Cast the caller's ballot in the active vote
    pub fn cast_ballot(&self, caller: &Caller, choice: &str) -> Result<(), SessionError> {
        let roster_size = self.shared.roster.len();

        let accepted = {
            let mut state = self.lock();
            let accepted = state
                .vote
                .cast_ballot(caller, choice, &self.shared.roster)
                .inspect_err(|e| self.rejected("cast_ballot", caller, e))?;
            state.version += 1;

            let summary = accepted
                .tally
                .summarize(&self.shared.config.rules, roster_size);
            self.shared.broadcast.publish(ObserverEvent::VoteTallyDelta {
                voter_count: summary.voter_count,
                total_eligible: summary.total_eligible,
            });
            self.shared.broadcast.notify(state.snapshot(roster_size));
            accepted
        };

        info!(
            "Ballot recorded for vote {} ({} of {} cast)",
            accepted.round,
            accepted.tally.total(),
            roster_size
        );
        self.shared.logger.log(SessionLogEvent::new(
            "ballot_cast",
            json!({
                "round": accepted.round,
                "ballots_cast": accepted.tally.total(),
            }),
        ));
        Ok(())
    }

    /// Open a vote on `target_id` and arm the auto-close timer
    pub fn start_vote(&self, caller: &Caller, target_id: &DocumentId) -> Result<(), SessionError> {
        let roster_size = self.shared.roster.len();
        let duration = self.shared.config.auto_close;
        let weak = Arc::downgrade(&self.shared);

        let opened = {
            let mut state = self.lock();
            let SessionState { ledger, vote, .. } = &mut *state;
            let opened = vote
                .start_vote(ledger, target_id, caller, |round| {
                    Self::arm_auto_close(weak, round, duration)
                })
                .inspect_err(|e| self.rejected("start_vote", caller, e))?;
            state.version += 1;

            self.shared.broadcast.publish(ObserverEvent::VoteStarted {
                target_title: opened.target.title.clone(),
            });
            self.shared.broadcast.notify(state.snapshot(roster_size));
            opened
        };

        info!(
            "Vote {} opened on \"{}\", auto-close in {:?}",
            opened.round, opened.target.title, duration
        );
        self.shared.logger.log(SessionLogEvent::new(
            "vote_started",
            json!({
                "round": opened.round,
                "target_id": opened.target.id,
                "target_title": opened.target.title,
                "auto_close_secs": duration.as_secs(),
            }),
        ));
        Ok(())
    }

    /// Close the active vote on the moderator's command
    pub fn finalize_vote(&self, caller: &Caller) -> Result<(), SessionError> {
        self.finalize(FinalizeTrigger::Manual(caller))
            .inspect_err(|e| self.rejected("finalize_vote", caller, e))
    }

    /// Timer entry point; goes through the same lock as manual actions
    ///
    /// A fire for a vote that was already closed, cleared or replaced
    /// returns [`SessionError::NoActiveVote`] and changes nothing.
    pub fn auto_close(&self, round: VoteRound) -> Result<(), SessionError> {
        self.finalize(FinalizeTrigger::Timer(round)).inspect_err(|e| {
            debug!("Ignoring auto-close for vote {}: {}", round, e);
        })
    }

    /// Wipe the ledger and force the vote back to idle
    pub fn clear_all(&self, caller: &Caller) -> Result<(), SessionError> {
        if !caller.is_moderator() {
            let err = SessionError::Unauthorized;
            self.rejected("clear_all", caller, &err);
            return Err(err);
        }

        let roster_size = self.shared.roster.len();
        let (interrupted, removed) = {
            let mut state = self.lock();
            let removed = state.ledger.len();
            state.ledger.clear();
            let interrupted = state.vote.reset();
            state.version += 1;

            if interrupted.is_some() {
                self.shared.broadcast.publish(ObserverEvent::VoteEnded);
            }
            self.shared.broadcast.notify(state.snapshot(roster_size));
            (interrupted, removed)
        };

        match interrupted {
            Some(round) => info!("Session cleared ({} entries), vote {} cancelled", removed, round),
            None => info!("Session cleared ({} entries)", removed),
        }
        self.shared.logger.log(SessionLogEvent::new(
            "session_cleared",
            json!({
                "entries_removed": removed,
                "interrupted_round": interrupted,
            }),
        ));
        Ok(())
    }

    // ==================== Queries ====================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot(self.shared.roster.len())
    }

    /// Vote status for one caller, including whether they already voted
    pub fn vote_status(&self, caller: &Caller) -> CallerVoteStatus {
        let state = self.lock();
        let status = state.vote.status(self.shared.roster.len());
        CallerVoteStatus {
            active: status.active,
            target_title: status.target_title,
            tally: status.tally,
            has_voted: state.vote.has_voted(&caller.id),
        }
    }

    /// Votable entries, newest first (the moderator's pick list)
    pub fn list_votable(&self) -> Vec<DocumentEntry> {
        self.lock().ledger.list_votable()
    }

    /// Connect an observer
    ///
    /// The initial snapshot and the receiver are taken under the session
    /// lock, so the stream continues exactly where the snapshot ends.
    pub fn subscribe(&self) -> ObserverSubscription {
        let state = self.lock();
        let initial = state.snapshot(self.shared.roster.len());
        let events = self.shared.broadcast.subscribe();
        drop(state);

        debug!(
            "Observer connected at version {} ({} observers)",
            initial.version,
            self.shared.broadcast.observer_count()
        );
        ObserverSubscription::new(initial, events)
    }

    // ==================== Internals ====================

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Transitions never leave state half-written, so a poisoned lock is still consistent
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn append_and_notify(&self, draft: DocumentDraft) -> Result<DocumentEntry, SessionError> {
        let mut state = self.lock();
        let entry = state.ledger.append(draft)?;
        state.version += 1;
        self.shared
            .broadcast
            .notify(state.snapshot(self.shared.roster.len()));
        Ok(entry)
    }

    fn finalize(&self, trigger: FinalizeTrigger<'_>) -> Result<(), SessionError> {
        let closed = {
            let mut state = self.lock();
            let SessionState { ledger, vote, .. } = &mut *state;
            let closed = vote.finalize(ledger, trigger, &self.shared.roster)?;
            state.version += 1;

            self.shared
                .broadcast
                .notify(state.snapshot(self.shared.roster.len()));
            self.shared.broadcast.publish(ObserverEvent::VoteEnded);
            closed
        };

        self.log_closed(&closed);
        Ok(())
    }

    fn arm_auto_close(
        shared: Weak<Shared>,
        round: VoteRound,
        duration: std::time::Duration,
    ) -> Box<dyn AutoCloseHandle> {
        Box::new(AutoCloseTimer::start(duration, move || {
            if let Some(shared) = shared.upgrade() {
                let _ = SessionCoordinator { shared }.auto_close(round);
            }
        }))
    }

    fn rejected(&self, action: &str, caller: &Caller, error: &SessionError) {
        if error.is_unauthorized() {
            warn!(
                "Unauthorized {} attempt by {} ({})",
                action, caller.id, caller.role
            );
        } else {
            debug!("Rejected {} from {}: {}", action, caller.id, error);
        }
    }

    fn log_entry(&self, event_type: &'static str, entry: &DocumentEntry) {
        self.shared.logger.log(SessionLogEvent::new(
            event_type,
            json!({
                "id": entry.id,
                "kind": entry.kind,
                "title": entry.title,
                "author": entry.author,
            }),
        ));
    }

    fn log_closed(&self, closed: &VoteClosed) {
        info!(
            "Vote {} on \"{}\" closed ({:?}): {}",
            closed.round, closed.report.target_title, closed.reason, closed.report.outcome
        );
        self.shared.logger.log(SessionLogEvent::new(
            "vote_closed",
            json!({
                "round": closed.round,
                "target_id": closed.target_id,
                "reason": closed.reason,
                "outcome": closed.report.outcome,
                "tally": closed.report.tally,
                "non_voters": closed.report.non_voters,
                "result_id": closed.result_entry.id,
            }),
        ));
    }
}
