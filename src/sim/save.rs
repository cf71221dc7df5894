//! Session persistence: one JSON snapshot, resumed on the next launch.
//!
//! ## Record format
//!
//! ```json
//! {"words":["layout"],"currentWord":"mockup","scrambledWord":"kumpoc",
//!  "points":0,"strikes":1,"passes":3,"gameOver":false,"feedback":"incorrect"}
//! ```
//!
//! `currentWord` is `""` once the queue is exhausted. `feedback` is optional.
//!
//! A missing, unreadable or malformed record loads as "no snapshot".
//! The caller then starts a new game.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::words::{MAX_PASSES, MAX_STRIKES, WORDS};
use crate::error::StoreError;
use crate::sim::event::Feedback;

pub const DEFAULT_SAVE_FILE: &str = "session.json";

// ══════════════════════════════════════════════════════════════
// Snapshot
// ══════════════════════════════════════════════════════════════

/// Every session field needed to resume exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Queue of words not yet presented.
    pub words: Vec<String>,
    pub current_word: String,
    pub scrambled_word: String,
    pub points: u32,
    pub strikes: u32,
    pub passes: u32,
    pub game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Snapshot {
    /// Parse and validate a stored record. Any problem yields `None`.
    pub fn decode(text: &str) -> Option<Snapshot> {
        let snap: Snapshot = match serde_json::from_str(text) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "discarding malformed session snapshot");
                return None;
            }
        };
        match snap.problem() {
            Some(reason) => {
                warn!(reason, "discarding inconsistent session snapshot");
                None
            }
            None => Some(snap),
        }
    }

    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// First invariant this snapshot breaks, if any.
    fn problem(&self) -> Option<&'static str> {
        if self.strikes > MAX_STRIKES {
            return Some("strikes out of range");
        }
        if self.passes > MAX_PASSES {
            return Some("passes out of range");
        }
        if !self.game_over && self.current_word.is_empty() {
            return Some("active session without a current word");
        }
        if !self.game_over && self.strikes >= MAX_STRIKES {
            return Some("active session with strikes exhausted");
        }
        // every point is one solved word, so points and undealt words share the list
        let current = usize::from(!self.current_word.is_empty());
        let accounted = (self.points as usize)
            .saturating_add(self.words.len())
            .saturating_add(current);
        if accounted > WORDS.len() {
            return Some("more points and words than the word list holds");
        }
        if !same_letters(&self.current_word, &self.scrambled_word) {
            return Some("scrambled word does not match current word");
        }
        None
    }
}

fn same_letters(a: &str, b: &str) -> bool {
    let mut a: Vec<char> = a.chars().collect();
    let mut b: Vec<char> = b.chars().collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

// ══════════════════════════════════════════════════════════════
// Store capability
// ══════════════════════════════════════════════════════════════

pub trait SessionStore {
    fn load(&self) -> Option<Snapshot>;
    fn save(&mut self, snap: &Snapshot) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn load(&self) -> Option<Snapshot> {
        (**self).load()
    }

    fn save(&mut self, snap: &Snapshot) -> Result<(), StoreError> {
        (**self).save(snap)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

// ══════════════════════════════════════════════════════════════
// File store
// ══════════════════════════════════════════════════════════════

/// Snapshot kept as a single JSON file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Store `file` in `dir`, or in the automatically chosen save directory.
    pub fn in_dir(dir: Option<&Path>, file: &str) -> Self {
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => save_dir(),
        };
        Self::new(dir.join(file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Option<Snapshot> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Snapshot::decode(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved session");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read saved session");
                None
            }
        }
    }

    fn save(&mut self, snap: &Snapshot) -> Result<(), StoreError> {
        let content = snap.encode()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        std::fs::write(&self.path, content).map_err(|e| self.io_err(e))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

/// Save directory: exe dir if writable, else `~/.local/share/scramble`, else CWD.
fn save_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // System installs (e.g. /usr/games) aren't writable
            let test_path = parent.join(".write_test_scramble");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/scramble");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// In-memory store
// ══════════════════════════════════════════════════════════════

/// Store that keeps the record in memory, used by `--no-save` and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    record: Option<String>,
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw stored record, valid or not.
    #[cfg(test)]
    pub fn with_record(record: &str) -> Self {
        MemoryStore { record: Some(record.to_string()), writes: 0 }
    }

    #[cfg(test)]
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<Snapshot> {
        self.record.as_deref().and_then(Snapshot::decode)
    }

    fn save(&mut self, snap: &Snapshot) -> Result<(), StoreError> {
        self.record = Some(snap.encode()?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.record = None;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            words: vec!["layout".into(), "design".into()],
            current_word: "mockup".into(),
            scrambled_word: "kcopum".into(),
            points: 2,
            strikes: 1,
            passes: 2,
            game_over: false,
            feedback: Some(Feedback::Incorrect),
        }
    }

    // ── Format ──

    #[test]
    fn encodes_camel_case_fields() {
        let json = sample().encode().unwrap();
        for key in ["\"words\"", "\"currentWord\"", "\"scrambledWord\"", "\"passes\"", "\"gameOver\""] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn feedback_is_optional() {
        let json = r#"{"words":[],"currentWord":"mockup","scrambledWord":"pumkoc",
                       "points":0,"strikes":0,"passes":3,"gameOver":false}"#;
        let snap = Snapshot::decode(json).unwrap();
        assert_eq!(snap.feedback, None);

        let mut s = sample();
        s.feedback = None;
        assert!(!s.encode().unwrap().contains("feedback"));
    }

    #[test]
    fn decode_accepts_what_encode_writes() {
        let snap = sample();
        assert_eq!(Snapshot::decode(&snap.encode().unwrap()), Some(snap));
    }

    // ── Malformed records ──

    #[test]
    fn garbage_is_no_snapshot() {
        assert_eq!(Snapshot::decode(""), None);
        assert_eq!(Snapshot::decode("null"), None);
        assert_eq!(Snapshot::decode("{not json"), None);
        assert_eq!(Snapshot::decode(r#"{"words":"mockup"}"#), None);
    }

    #[test]
    fn out_of_range_counters_are_rejected() {
        let mut s = sample();
        s.strikes = MAX_STRIKES + 1;
        assert_eq!(Snapshot::decode(&s.encode().unwrap()), None);

        let mut s = sample();
        s.passes = MAX_PASSES + 1;
        assert_eq!(Snapshot::decode(&s.encode().unwrap()), None);

        let json = sample().encode().unwrap().replace("\"points\":2", "\"points\":-1");
        assert_eq!(Snapshot::decode(&json), None);
    }

    #[test]
    fn impossible_points_are_rejected() {
        let json = sample().encode().unwrap().replace("\"points\":2", "\"points\":4294967295");
        assert_eq!(Snapshot::decode(&json), None);

        let mut s = sample();
        s.points = (WORDS.len() - s.words.len()) as u32;
        assert_eq!(Snapshot::decode(&s.encode().unwrap()), None);

        // one fewer fits exactly
        s.points -= 1;
        assert!(Snapshot::decode(&s.encode().unwrap()).is_some());
    }

    #[test]
    fn inconsistent_words_are_rejected() {
        let mut s = sample();
        s.scrambled_word = "layout".into();
        assert_eq!(Snapshot::decode(&s.encode().unwrap()), None);

        let mut s = sample();
        s.current_word.clear();
        s.scrambled_word.clear();
        assert_eq!(Snapshot::decode(&s.encode().unwrap()), None);
    }

    #[test]
    fn finished_session_with_no_word_is_valid() {
        let mut s = sample();
        s.words.clear();
        s.current_word.clear();
        s.scrambled_word.clear();
        s.game_over = true;
        assert!(Snapshot::decode(&s.encode().unwrap()).is_some());
    }

    // ── File store ──

    #[test]
    fn file_store_save_load_clear() {
        let td = tempfile::tempdir().unwrap();
        let mut store = FileStore::in_dir(Some(td.path()), DEFAULT_SAVE_FILE);
        assert_eq!(store.load(), None);

        store.save(&sample()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load(), Some(sample()));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn file_store_creates_missing_dirs() {
        let td = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(td.path().join("nested/deeper/session.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
    }

    #[test]
    fn file_store_malformed_file_is_none() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join(DEFAULT_SAVE_FILE);
        std::fs::write(&path, "{\"words\": [").unwrap();
        assert_eq!(FileStore::new(&path).load(), None);
    }

    #[test]
    fn file_store_reports_write_failure() {
        let td = tempfile::tempdir().unwrap();
        // a directory where the file should be
        let path = td.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        let mut store = FileStore::new(&path);
        assert!(matches!(store.save(&sample()), Err(StoreError::Io { .. })));
    }

    // ── Memory store ──

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.save(&sample()).unwrap();
        store.save(&sample()).unwrap();
        assert_eq!(store.writes, 2);
        assert_eq!(store.load(), Some(sample()));
        store.clear().unwrap();
        assert!(store.record().is_none());
    }
}
