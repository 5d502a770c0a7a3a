//! Append-only dispatch history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dispatch::DispatchOutcome;
use crate::error::StoreError;
use crate::store::json::{read_json_file, write_json_file};

/// Which sending path produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendKind {
    Single,
    Bulk,
    Personalized,
    Csv,
}

/// One dispatch attempt, as recorded for audit and history display.
/// Entries are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: SendKind,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_company: Option<String>,
}

impl LogEntry {
    pub fn new(kind: SendKind, outcome: DispatchOutcome) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            outcome,
            contact_name: None,
            contact_company: None,
        }
    }

    pub fn with_contact(
        mut self,
        name: Option<String>,
        company: Option<String>,
    ) -> Self {
        self.contact_name = name;
        self.contact_company = company;
        self
    }
}

/// Append-only store over a single JSON file. `list` returns entries
/// oldest-first; presentation may reverse for display. There is no querying
/// and no retention policy: history accumulates indefinitely.
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, entry: LogEntry) -> Result<(), StoreError> {
        self.append_all(vec![entry])
    }

    pub fn append_all(&self, entries: Vec<LogEntry>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut logs = self.list()?;
        logs.extend(entries);
        write_json_file(&self.path, &logs)
    }

    pub fn list(&self) -> Result<Vec<LogEntry>, StoreError> {
        read_json_file(&self.path)
    }
}
