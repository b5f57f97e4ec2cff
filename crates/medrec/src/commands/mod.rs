//! # Command Layer
//!
//! This module contains the **core business logic** of medrec. Each command lives in its
//! own submodule and implements pure Rust functions over a [`RecordRepository`].
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Implement the actual logic for each operation
//! - Operate on `MedicalRecord`, `NewRecord` and the table types
//! - Return structured `CmdResult` with affected records and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Permission checks**: The API facade gates every call before it gets here
//! - **Terminal output**: No stdout or stderr; messages are returned, not printed
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings. This struct carries:
//! - `affected_records`: Records that were created, changed, removed or restored
//! - `listed_records`: Records to display, as [`DisplayRecord`] with their canonical index
//! - `page`: Pagination metadata for listings
//! - `messages`: Leveled notifications (info, success, warning, error)
//!
//! Messages are the notification channel: every success, skipped import row
//! and failure a user should see is one [`CmdMessage`].
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.**
//!
//! Command tests should:
//! - Use `InMemoryStore` to avoid filesystem dependencies
//! - Test all logic branches and edge cases
//! - Verify correct `CmdResult` contents
//!
//! ## Command Modules
//!
//! - [`create`]: Validate and add a record
//! - [`list`]: Filter, sort and paginate records
//! - [`view`]: Show one record
//! - [`update`]: Edit one field through the cell editor
//! - [`delete`]: Remove a record, keeping it for undo
//! - [`undo`]: Restore the last deleted record
//! - [`export`]: Write records to JSON or CSV
//! - [`import`]: Read records from JSON or CSV
//! - [`stats`]: Summary figures
//! - [`account`]: Login, logout and profile

use crate::index::DisplayRecord;
use crate::model::MedicalRecord;
use crate::stats::{Bucket, RecordStats};
use crate::auth::User;
use crate::store::RecordRepository;
use serde::Serialize;
use std::path::PathBuf;

pub mod account;
pub mod create;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod stats;
pub mod undo;
pub mod update;
pub mod view;

/// Storage key of the single-slot undo buffer.
pub const UNDO_KEY: &str = "lastDeletedRecord";

/// Lock name held for the duration of an import.
pub const IMPORT_LOCK: &str = "import";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Where a listing sits within the filtered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub total_records: usize,
}

/// Figures for the `stats` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub summary: RecordStats,
    pub blood_groups: Vec<(String, usize)>,
    pub registrations: Vec<Bucket>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<MedicalRecord>,
    pub listed_records: Vec<DisplayRecord>,
    pub page: Option<PageInfo>,
    pub written_paths: Vec<PathBuf>,
    pub stats: Option<StatsReport>,
    pub user: Option<User>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<MedicalRecord>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<DisplayRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// Canonical display indexes for `rows`, which must borrow from
/// `store.records()`.
pub(crate) fn index_rows<R: RecordRepository + ?Sized>(
    store: &R,
    rows: &[&MedicalRecord],
) -> Vec<DisplayRecord> {
    let all = store.records();
    rows.iter()
        .filter_map(|row| {
            all.iter()
                .position(|r| std::ptr::eq(r, *row))
                .map(|pos| DisplayRecord {
                    index: pos + 1,
                    record: (*row).clone(),
                })
        })
        .collect()
}
