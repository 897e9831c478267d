//! Local transcript persistence
//!
//! Confirmed messages are stored as one JSON array in a single file and
//! rewritten whole on every append. A missing or unreadable store is an
//! empty transcript, never an error. The read-modify-write is not atomic;
//! concurrent writers can race and lose appends, as the original single
//! storage key did.

use std::path::{Path, PathBuf};

use chrono::{Local, LocalResult, TimeZone};
use parley_protocol::ChatMessage;
use parley_utils::{ParleyError, Result};

/// File name used by transcript exports
pub const EXPORT_FILE_NAME: &str = "chat-transcript.txt";

/// Append-only store of confirmed chat messages
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    /// Create a store backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default transcript location
    pub fn at_default_path() -> Self {
        Self::new(parley_utils::transcript_file())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every persisted record, in append order
    ///
    /// A missing file or corrupt contents yield an empty list.
    pub fn load_all(&self) -> Vec<ChatMessage> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Corrupt transcript store, treating as empty: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    /// Append one record: read the whole list, push, rewrite whole
    pub fn append(&self, record: &ChatMessage) -> Result<()> {
        let mut records = self.load_all();
        records.push(record.clone());
        self.write_all(&records)
    }

    /// Erase all persisted records
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ParleyError::FileWrite {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Render every record as one `[localized-time] user: text` line
    pub fn export_as_text(&self) -> String {
        self.load_all()
            .iter()
            .map(|record| {
                format!(
                    "[{}] {}: {}",
                    format_local_datetime(record.time),
                    record.display_user(),
                    record.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the text export into `dir` and return the file path
    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, self.export_as_text()).map_err(|e| ParleyError::FileWrite {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    fn write_all(&self, records: &[ChatMessage]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            parley_utils::ensure_dir(parent).map_err(|e| ParleyError::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let encoded = serde_json::to_string(records)
            .map_err(|e| ParleyError::persistence(format!("Failed to encode transcript: {}", e)))?;
        std::fs::write(&self.path, encoded).map_err(|e| ParleyError::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Format epoch milliseconds as a localized date-time
pub fn format_local_datetime(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis) {
        LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> TranscriptStore {
        TranscriptStore::new(dir.path().join("transcript.json"))
    }

    fn record(id: &str, user: &str, text: &str, time: i64) -> ChatMessage {
        ChatMessage {
            id: Some(id.to_string()),
            user: user.to_string(),
            text: text.to_string(),
            time,
        }
    }

    // ==================== load_all Tests ====================

    #[test]
    fn test_load_all_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_load_all_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "definitely not json").unwrap();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_load_all_wrong_shape_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"not":"an array"}"#).unwrap();
        assert!(store.load_all().is_empty());
    }

    // ==================== append Tests ====================

    #[test]
    fn test_append_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let before = store.load_all();
        let m = record("a-1", "Ann", "hi", 1000);
        store.append(&m).unwrap();

        let after = store.load_all();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last(), Some(&m));
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        for i in 0..5 {
            store
                .append(&record(&format!("id-{}", i), "Ann", &format!("msg {}", i), i))
                .unwrap();
        }

        let records = store.load_all();
        assert_eq!(records.len(), 5);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.text, format!("msg {}", i));
        }
    }

    #[test]
    fn test_append_over_corrupt_store_starts_fresh() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "garbage").unwrap();

        store.append(&record("a-1", "Ann", "hi", 1)).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("deep").join("transcript.json"));
        store.append(&record("a-1", "Ann", "hi", 1)).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    // ==================== clear Tests ====================

    #[test]
    fn test_clear_removes_records() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("a-1", "Ann", "hi", 1)).unwrap();

        store.clear().unwrap();
        assert!(store.load_all().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear_when_empty_is_ok() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.clear().unwrap();
    }

    // ==================== export Tests ====================

    #[test]
    fn test_export_as_text_lines() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .append(&record("a-1", "Ann", "hello", 1_700_000_000_000))
            .unwrap();
        store
            .append(&record("a-2", "Bob", "hey", 1_700_000_001_000))
            .unwrap();

        let text = store.export_as_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Ann: hello"));
        assert!(lines[1].contains("Bob: hey"));
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn test_export_empty_store() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.export_as_text(), "");
    }

    #[test]
    fn test_export_defaults_unnamed_sender() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .append(&ChatMessage {
                id: None,
                user: String::new(),
                text: "anon".into(),
                time: 1,
            })
            .unwrap();
        assert!(store.export_as_text().contains("Remote: anon"));
    }

    #[test]
    fn test_export_to_file_name() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.append(&record("a-1", "Ann", "hi", 1)).unwrap();

        let out = store.export_to_file(dir.path()).unwrap();
        assert_eq!(out.file_name().unwrap().to_str().unwrap(), EXPORT_FILE_NAME);
        let contents = std::fs::read_to_string(out).unwrap();
        assert!(contents.contains("Ann: hi"));
    }

    // ==================== format_local_datetime Tests ====================

    #[test]
    fn test_format_local_datetime_shape() {
        let formatted = format_local_datetime(1_700_000_000_000);
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(formatted.len(), 19);
        assert!(formatted.contains('-'));
        assert!(formatted.contains(':'));
    }
}
