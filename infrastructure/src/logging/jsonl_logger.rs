//! JSONL transcript writer for session events.
//!
//! Each [`SessionLogEvent`] becomes one JSON line carrying `type`, `seq` and
//! `timestamp` next to the event payload. The file is opened in append mode,
//! so restarting the binary with the same path continues the transcript.

use plenary_application::ports::session_logger::{SessionLogEvent, SessionLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct TranscriptWriter {
    out: BufWriter<File>,
    seq: u64,
}

/// Session transcript logger writing one JSON object per line.
///
/// Thread-safe via a `Mutex` around the writer and sequence counter.
pub struct JsonlSessionLogger {
    writer: Mutex<TranscriptWriter>,
    path: PathBuf,
}

impl JsonlSessionLogger {
    /// Open (or create) the transcript at `path`.
    ///
    /// Parent directories are created as needed. Returns `None` and warns
    /// if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(TranscriptWriter {
                out: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: SessionLogEvent, seq: u64) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert("seq".to_string(), Value::from(seq));
        map.insert("timestamp".to_string(), Value::from(timestamp));
        Value::Object(map)
    }
}

impl SessionLogger for JsonlSessionLogger {
    fn log(&self, event: SessionLogEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        writer.seq += 1;
        let record = Self::record(event, writer.seq);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if writeln!(writer.out, "{}", line)
            .and_then(|_| writer.out.flush())
            .is_err()
        {
            warn!("Failed to write transcript line to {}", self.path.display());
        }
    }
}

impl Drop for JsonlSessionLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let logger = JsonlSessionLogger::new(&path).unwrap();

        logger.log(SessionLogEvent::new(
            "document_submitted",
            serde_json::json!({"title": "Ocean", "author": "FRANCE"}),
        ));
        logger.log(SessionLogEvent::new(
            "vote_started",
            serde_json::json!({"round": 1}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "document_submitted");
        assert_eq!(lines[0]["title"], "Ocean");
        assert_eq!(lines[0]["seq"], 1);
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "vote_started");
        assert_eq!(lines[1]["seq"], 2);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.jsonl");
        let logger = JsonlSessionLogger::new(&path).unwrap();

        logger.log(SessionLogEvent::new("note", serde_json::json!("plain")));
        logger.log(SessionLogEvent::new("empty", Value::Null));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["data"], "plain");
        assert_eq!(lines[1]["type"], "empty");
        assert!(lines[1].get("data").is_none());
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("append.jsonl");

        let first = JsonlSessionLogger::new(&path).unwrap();
        first.log(SessionLogEvent::new("session_cleared", serde_json::json!({})));
        drop(first);

        let second = JsonlSessionLogger::new(&path).unwrap();
        assert_eq!(second.path(), path.as_path());
        second.log(SessionLogEvent::new("session_cleared", serde_json::json!({})));
        drop(second);

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlSessionLogger::new(dir.path()).is_none());
    }
}
