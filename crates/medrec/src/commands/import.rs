//! Bulk import from a `.json` or `.csv` file.
//!
//! The file is parsed by [`crate::codec`]; this module decides which parsed
//! records enter the store. A record is skipped, with one warning each, when
//!
//! - the codec could not turn its row into a record,
//! - it fails the same checks as the entry form, or
//! - its UID already exists in the store or earlier in the same file.
//!
//! Survivors are prepended in file order with a single store write.
//! Only one import runs at a time: the store's `import` lock is held from
//! before the file is read until the records are written.

use crate::codec::{self, ImportBatch, ImportFormat};
use crate::commands::{CmdMessage, CmdResult, IMPORT_LOCK};
use crate::error::{MedrecError, Result};
use crate::store::RecordRepository;
use crate::validation::validate_record;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub fn run<R: RecordRepository>(
    store: &mut R,
    path: &Path,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let format = ImportFormat::from_path(path)?;
    if !store.storage().try_lock(IMPORT_LOCK)? {
        return Err(MedrecError::ImportInProgress);
    }
    let outcome = fs::read_to_string(path)
        .map_err(MedrecError::from)
        .and_then(|text| codec::import(format, &text, now))
        .and_then(|batch| apply(store, batch, actor, now));
    if let Err(e) = store.storage().unlock(IMPORT_LOCK) {
        log::warn!("failed to release import lock: {}", e);
    }
    outcome
}

/// Vets a parsed batch and inserts what survives.
pub fn apply<R: RecordRepository>(
    store: &mut R,
    batch: ImportBatch,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for rejected in &batch.rejected {
        log::warn!("import row {} skipped: {}", rejected.row, rejected.reason);
        result.add_message(CmdMessage::warning(format!(
            "Skipped row {}: {}",
            rejected.row, rejected.reason
        )));
    }

    let mut uids: HashSet<String> = store.records().iter().map(|r| r.uid.clone()).collect();
    let mut ids: HashSet<String> = store.records().iter().map(|r| r.id.clone()).collect();
    let mut accepted = Vec::new();

    for mut record in batch.records {
        if let Err(e) = validate_record(&record) {
            log::warn!("import skipped invalid record {}: {}", record.uid, e);
            result.add_message(CmdMessage::warning(format!(
                "Skipped invalid record {}: {}",
                display_key(&record.uid, &record.name),
                e
            )));
            continue;
        }
        if !uids.insert(record.uid.clone()) {
            log::warn!("import skipped duplicate uid {}", record.uid);
            result.add_message(CmdMessage::warning(format!(
                "Skipped record with duplicate UID: {}",
                record.uid
            )));
            continue;
        }
        if !ids.insert(record.id.clone()) {
            log::debug!("import reassigned colliding id {}", record.id);
            record.id = Uuid::new_v4().to_string();
            ids.insert(record.id.clone());
        }
        record.stamp_created(actor, now);
        accepted.push(record);
    }

    if accepted.is_empty() {
        result.add_message(CmdMessage::info("No records were imported"));
        return Ok(result);
    }
    let count = accepted.len();
    store.insert_imported(accepted.clone())?;
    result.add_message(CmdMessage::success(format!(
        "Imported {} records successfully",
        count
    )));
    Ok(result.with_affected_records(accepted))
}

fn display_key(uid: &str, name: &str) -> String {
    if uid.is_empty() {
        format!("'{}'", name)
    } else {
        uid.to_string()
    }
}
