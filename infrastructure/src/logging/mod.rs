//! Logging infrastructure: the session transcript.
//!
//! Provides [`JsonlSessionLogger`], a JSONL file writer that implements
//! the [`SessionLogger`](plenary_application::SessionLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSessionLogger;
