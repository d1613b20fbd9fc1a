//! Append-only document ledger
//!
//! Insertion order is the source of truth for display order. Entries are
//! never edited or removed individually; [`DocumentLedger::clear`] is the
//! only way to drop them.

use super::entities::{DocumentDraft, DocumentEntry, DocumentId};
use crate::core::error::SessionError;
use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct DocumentLedger {
    entries: Vec<DocumentEntry>,
    /// Latest timestamp handed out, kept across `clear` so stamps never go backwards
    last_stamp: Option<DateTime<Utc>>,
}

impl DocumentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, stamp and append a draft, returning the stored entry
    pub fn append(&mut self, draft: DocumentDraft) -> Result<DocumentEntry, SessionError> {
        self.append_at(draft, Utc::now())
    }

    /// Same as [`append`](Self::append) with an explicit wall-clock reading
    ///
    /// A reading earlier than the previous entry is clamped forward.
    pub fn append_at(
        &mut self,
        draft: DocumentDraft,
        now: DateTime<Utc>,
    ) -> Result<DocumentEntry, SessionError> {
        draft.validate()?;

        let created_at = match self.last_stamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_stamp = Some(created_at);

        let entry = DocumentEntry {
            id: DocumentId::new(),
            kind: draft.kind,
            title: draft.title,
            body: draft.body,
            author: draft.author,
            created_at,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&DocumentEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Resolutions and amendments, newest first
    pub fn list_votable(&self) -> Vec<DocumentEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.is_votable())
            .cloned()
            .collect()
    }

    /// All entries in reverse insertion order
    pub fn snapshot_newest_first(&self) -> Vec<DocumentEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
