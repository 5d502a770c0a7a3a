//! Reusable message templates, keyed by caller-chosen id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::store::json::{read_json_file, write_json_file};

/// A reusable subject/body pair. Placeholders are resolved at send time, not
/// at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: String,
    pub subject: String,
    pub body: String,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Template persistence: upsert by id and list.
///
/// Deletion is intentionally not an operation of this store.
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns all saved templates, oldest save position first.
    pub fn list(&self) -> Result<Vec<MessageTemplate>, StoreError> {
        read_json_file(&self.path)
    }

    /// Inserts or replaces the template with the same id. The stored
    /// `updated_at` is stamped here, not taken from the caller.
    pub fn save(&self, mut template: MessageTemplate) -> Result<(), StoreError> {
        template.updated_at = Utc::now();

        let mut templates = self.list()?;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => templates.push(template),
        }

        write_json_file(&self.path, &templates)
    }

    pub fn find(&self, id: &str) -> Result<Option<MessageTemplate>, StoreError> {
        Ok(self.list()?.into_iter().find(|t| t.id == id))
    }
}
