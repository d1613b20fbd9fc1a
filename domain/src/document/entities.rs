//! Ledger entry entities

use crate::core::error::SessionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Kind of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resolution,
    Amendment,
    Announcement,
    VoteResult,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resolution => "resolution",
            DocumentKind::Amendment => "amendment",
            DocumentKind::Announcement => "announcement",
            DocumentKind::VoteResult => "vote_result",
        }
    }

    /// Resolutions and amendments can be put to a vote
    pub fn is_votable(&self) -> bool {
        matches!(self, DocumentKind::Resolution | DocumentKind::Amendment)
    }

    /// Human-readable label ("Vote Result")
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Resolution => "Resolution",
            DocumentKind::Amendment => "Amendment",
            DocumentKind::Announcement => "Announcement",
            DocumentKind::VoteResult => "Vote Result",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resolution" => Ok(DocumentKind::Resolution),
            "amendment" => Ok(DocumentKind::Amendment),
            "announcement" | "moderator_announcement" => Ok(DocumentKind::Announcement),
            "vote_result" => Ok(DocumentKind::VoteResult),
            other => Err(format!(
                "Unknown document kind: {}. Valid: resolution, amendment, announcement, vote_result",
                other
            )),
        }
    }
}

/// Unvalidated input for a new ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub kind: DocumentKind,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub author: String,
}

impl DocumentDraft {
    pub fn new(
        kind: DocumentKind,
        title: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            author: author.into(),
        }
    }

    /// Check required fields
    ///
    /// Title and author are always required. Resolutions and amendments also
    /// need a body; announcements and results may be bodiless.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.title.trim().is_empty() {
            return Err(SessionError::Validation("title is required".to_string()));
        }
        if self.author.trim().is_empty() {
            return Err(SessionError::Validation("author is required".to_string()));
        }
        if self.kind.is_votable() && self.body.trim().is_empty() {
            return Err(SessionError::Validation(format!(
                "{} body is required",
                self.kind
            )));
        }
        Ok(())
    }
}

/// An immutable record in the document stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl DocumentEntry {
    pub fn is_votable(&self) -> bool {
        self.kind.is_votable()
    }
}
