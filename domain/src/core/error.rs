//! Domain error types

use thiserror::Error;

/// Rejection reasons for session actions
///
/// Every variant is reported to the caller only. A rejected action never
/// mutates the session and never triggers a broadcast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid submission: {0}")]
    Validation(String),

    #[error("Unauthorized action")]
    Unauthorized,

    #[error("No formal vote is currently active")]
    NoActiveVote,

    #[error("A formal vote is already active")]
    VoteAlreadyActive,

    #[error("Invalid document ID or document type for voting")]
    InvalidTarget,

    #[error("You have already cast your vote")]
    AlreadyVoted,

    #[error("Invalid vote choice")]
    InvalidChoice,
}

impl SessionError {
    /// Short machine-readable code, stable across releases
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Validation(_) => "validation_error",
            SessionError::Unauthorized => "unauthorized",
            SessionError::NoActiveVote => "no_active_vote",
            SessionError::VoteAlreadyActive => "vote_already_active",
            SessionError::InvalidTarget => "invalid_target",
            SessionError::AlreadyVoted => "already_voted",
            SessionError::InvalidChoice => "invalid_choice",
        }
    }

    /// Check if this error is a role mismatch rather than a state conflict
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Unauthorized)
    }
}
