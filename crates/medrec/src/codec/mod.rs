//! # Import / Export
//!
//! Converts record lists to and from the two file formats users exchange:
//! pretty-printed JSON arrays and quoted CSV.
//!
//! Both import paths share one shape. Text is parsed into loose JSON objects,
//! each object is stamped (`createdAt` when missing, `lastUpdated` always) and
//! then converted into a [`MedicalRecord`]. Structural problems (malformed
//! JSON, a header/value count mismatch) reject the whole file with
//! [`MedrecError::Parse`]. A single row that cannot become a record, such as
//! one with an unknown blood group, is reported in [`ImportBatch::rejected`]
//! and the rest of the file still imports.
//!
//! Deciding which parsed records actually enter the store (uniqueness,
//! form validation) is the import command's job, not the codec's.

use crate::error::{MedrecError, Result};
use crate::model::{timestamp, MedicalRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

pub mod csv;
pub mod json;

pub use self::csv::{export_csv, import_csv, split_csv_line};
pub use self::json::{export_json, import_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Picks the format from the file extension, case-insensitively.
    /// Anything other than `.json` or `.csv` is refused before the file is
    /// read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(ImportFormat::Json),
            Some("csv") => Ok(ImportFormat::Csv),
            _ => Err(MedrecError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImportFormat::Json => "json",
            ImportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFormat::Json => f.write_str("JSON"),
            ImportFormat::Csv => f.write_str("CSV"),
        }
    }
}

/// `patient_records_<YYYY-MM-DD>.<ext>`
pub fn export_filename(format: ImportFormat, date: NaiveDate) -> String {
    format!(
        "patient_records_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn export(format: ImportFormat, records: &[MedicalRecord]) -> Result<String> {
    match format {
        ImportFormat::Json => export_json(records),
        ImportFormat::Csv => export_csv(records),
    }
}

pub fn import(format: ImportFormat, text: &str, now: DateTime<Utc>) -> Result<ImportBatch> {
    match format {
        ImportFormat::Json => import_json(text, now),
        ImportFormat::Csv => import_csv(text, now),
    }
}

/// A row the codec could read but not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based position among the file's records (data rows for CSV).
    pub row: usize,
    pub reason: String,
}

/// Result of parsing an import file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    /// Parsed records, in file order.
    pub records: Vec<MedicalRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, row: usize, object: Map<String, Value>, now: DateTime<Utc>) {
        match into_record(object, now) {
            Ok(record) => self.records.push(record),
            Err(reason) => {
                log::debug!("import row {} rejected: {}", row, reason);
                self.rejected.push(RejectedRow { row, reason });
            }
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Applies import stamping and converts a loose object into a record.
fn into_record(mut object: Map<String, Value>, now: DateTime<Utc>) -> std::result::Result<MedicalRecord, String> {
    if is_blank(object.get("createdAt")) {
        object.insert(
            "createdAt".into(),
            Value::String(now.format("%Y-%m-%d").to_string()),
        );
    }
    object.insert("lastUpdated".into(), Value::String(timestamp(now)));
    if is_blank(object.get("id")) {
        object.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    }
    // Every record field is text; other tools write heights and weights as numbers.
    for value in object.values_mut() {
        if let Value::Number(n) = value {
            *value = Value::String(n.to_string());
        }
    }
    serde_json::from_value(Value::Object(object)).map_err(|e| e.to_string())
}
