//! # Storage Layer
//!
//! This module defines the storage abstraction for medrec. Two traits split
//! the work:
//!
//! - [`backend::StorageBackend`]: durable key-value storage. Knows nothing about
//!   records; it stores whole strings under keys and hands out advisory locks.
//! - [`RecordRepository`]: the record operations the rest of the crate uses
//!   (`get/add/update/delete`, undo, bulk import). Commands are generic over
//!   it, so any store can be swapped in without touching callers.
//!
//! [`record_store::RecordStore`] implements the repository on top of any
//! backend.
//!
//! ## Persistence Model
//!
//! The store keeps the full record list in memory, newest first. After each
//! successful mutation the **entire** list is serialized and written under
//! the `medicalRecords` key. There is no incremental persistence and no
//! transaction log; a failed write rolls the in-memory change back.
//!
//! At startup a missing or unparseable `medicalRecords` entry is treated as
//! "no saved data" and the store starts empty.
//!
//! ## Uniqueness
//!
//! `uid` is unique across the store at all times. `add` and `update` check it
//! before mutating; `undo_delete` does not, since the record was valid when it
//! was removed.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `RecordStore` over [`fs_backend::FsBackend`].
//! - [`memory::InMemoryStore`]: `RecordStore` over [`mem_backend::MemBackend`],
//!   for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── medicalRecords.json       # All records (JSON array)
//! ├── medicalRecordsUser.json   # Logged-in user
//! ├── lastDeletedRecord.json    # Undo buffer for the last delete
//! ├── medrec.toml               # Configuration
//! └── import.lock               # Present while an import runs
//! ```

use crate::error::Result;
use crate::model::{MedicalRecord, RecordField};
use backend::StorageBackend;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod record_store;

/// Abstract interface for record storage.
///
/// Implementations own uniqueness and provenance; permission checks happen
/// in front of the repository, in the API layer.
pub trait RecordRepository {
    /// All records, newest first.
    fn records(&self) -> &[MedicalRecord];

    /// The key-value storage underneath, for auxiliary state such as the
    /// undo buffer and the import lock.
    fn storage(&self) -> &dyn StorageBackend;

    fn get(&self, id: &str) -> Option<&MedicalRecord> {
        self.records().iter().find(|r| r.id == id)
    }

    fn contains_uid(&self, uid: &str) -> bool {
        self.records().iter().any(|r| r.uid == uid)
    }

    /// Prepend a record, stamping provenance. Fails on a duplicate `uid`.
    fn add(&mut self, record: MedicalRecord, actor: &str) -> Result<&MedicalRecord>;

    /// Replace one field of a record, re-stamping provenance.
    fn update(
        &mut self,
        id: &str,
        field: RecordField,
        value: &str,
        actor: &str,
    ) -> Result<&MedicalRecord>;

    /// Remove a record and hand it back so the caller can offer undo.
    fn delete(&mut self, id: &str) -> Result<MedicalRecord>;

    /// Reinsert a previously deleted record at the head, unchecked.
    fn undo_delete(&mut self, record: MedicalRecord) -> Result<()>;

    /// Prepend already-vetted imported records in one write.
    fn insert_imported(&mut self, records: Vec<MedicalRecord>) -> Result<()>;
}
