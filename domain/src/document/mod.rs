//! Document stream domain
//!
//! - [`entities::DocumentEntry`]: an immutable ledger record
//! - [`ledger::DocumentLedger`]: the append-only chronological record

pub mod entities;
pub mod ledger;

pub use entities::{DocumentDraft, DocumentEntry, DocumentId, DocumentKind};
pub use ledger::DocumentLedger;
