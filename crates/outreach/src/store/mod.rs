//! Flat-file JSON persistence.
//!
//! Every store is a single pretty-printed JSON document on disk, created on
//! first use. There are no transactions and no migrations; history stores are
//! append-only. This is deliberate for the scale this system targets (one
//! small organization's outreach volume) and is a known scaling non-goal.

pub mod accounts;
pub mod json;
pub mod logs;
pub mod templates;

pub use accounts::AccountStore;
pub use logs::{LogEntry, LogStore, SendKind};
pub use templates::{MessageTemplate, TemplateStore};
