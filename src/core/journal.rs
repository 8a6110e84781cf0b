//! # Call Journal
//!
//! A client-side record of every outcome posted during a landing session.
//! The backend keeps the authoritative contact history; the journal exists
//! so an operator can review what they reported after the session ends.
//!
//! Each session is a JSON file (`<uuid>.json`) under `~/.pollcall/journal/`.
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash
//! safety. Journal trouble must never break a calling workflow, so the
//! session-level entry point logs failures and swallows them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One recorded call outcome.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallRecord {
    pub phone_number: String,
    pub outcome: String,
    /// Unix timestamp of the backend ack.
    pub recorded_at: i64,
}

impl CallRecord {
    pub fn now(phone_number: &str, outcome: &str) -> Self {
        Self {
            phone_number: phone_number.to_string(),
            outcome: outcome.to_string(),
            recorded_at: Utc::now().timestamp(),
        }
    }
}

/// Summary metadata for a journal file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JournalMeta {
    pub id: String,
    pub started_at: i64,
    pub updated_at: i64,
    pub call_count: usize,
}

/// Full journal data: metadata + the calls in the order they were recorded.
#[derive(Serialize, Deserialize, Debug)]
pub struct JournalData {
    pub meta: JournalMeta,
    pub calls: Vec<CallRecord>,
}

/// Returns `~/.pollcall/journal/`, creating it if needed.
pub fn journal_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".pollcall").join("journal");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Generate a new UUID v4 journal ID.
pub fn new_journal_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Derive metadata from the recorded calls.
fn derive_meta(id: &str, calls: &[CallRecord]) -> JournalMeta {
    let started_at = calls.first().map(|c| c.recorded_at).unwrap_or(0);
    let updated_at = calls.last().map(|c| c.recorded_at).unwrap_or(started_at);
    JournalMeta {
        id: id.to_string(),
        started_at,
        updated_at,
        call_count: calls.len(),
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Save a journal to `dir`. Empty journals are not written.
pub fn save_journal(dir: &Path, id: &str, calls: &[CallRecord]) -> io::Result<()> {
    if calls.is_empty() {
        return Ok(());
    }
    let data = JournalData {
        meta: derive_meta(id, calls),
        calls: calls.to_vec(),
    };
    atomic_write_json(&dir.join(format!("{}.json", id)), &data)
}

/// Load a journal from `dir` by ID.
pub fn load_journal(dir: &Path, id: &str) -> io::Result<JournalData> {
    let json = fs::read_to_string(dir.join(format!("{}.json", id)))?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// The journal of one live session: an ID plus the calls recorded so far.
pub struct SessionJournal {
    id: String,
    calls: Vec<CallRecord>,
}

impl SessionJournal {
    pub fn new() -> Self {
        Self {
            id: new_journal_id(),
            calls: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Appends one record and persists the journal. This is the single entry
    /// point used by workflows; failures are logged, never returned.
    pub fn record(&mut self, phone_number: &str, outcome: &str) {
        self.calls.push(CallRecord::now(phone_number, outcome));
        match journal_dir().and_then(|dir| save_journal(&dir, &self.id, &self.calls)) {
            Ok(()) => debug!("Journal saved: {}", self.id),
            Err(e) => warn!("Failed to save call journal: {}", e),
        }
    }
}

impl Default for SessionJournal {
    fn default() -> Self {
        Self::new()
    }
}
