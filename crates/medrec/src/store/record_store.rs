use super::backend::StorageBackend;
use super::RecordRepository;
use crate::error::{MedrecError, Result};
use crate::model::{MedicalRecord, RecordField};
use crate::validation::validate_field;
use chrono::Utc;

/// Storage key holding the JSON array of all records.
pub const RECORDS_KEY: &str = "medicalRecords";

/// The record list plus its persistence boundary.
///
/// Every successful mutation rewrites the whole list under [`RECORDS_KEY`].
/// If that write fails the in-memory change is rolled back, so memory and
/// storage never disagree.
pub struct RecordStore<B: StorageBackend> {
    pub(crate) backend: B,
    records: Vec<MedicalRecord>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Reads the saved records. Missing or unreadable data yields an empty
    /// store instead of an error.
    pub fn load(backend: B) -> Self {
        let records = match backend.get(RECORDS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<MedicalRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    log::warn!("saved records are unreadable, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("could not read saved records, starting empty: {}", e);
                Vec::new()
            }
        };
        log::debug!("loaded {} records", records.len());
        Self { backend, records }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.records)?;
        self.backend.set(RECORDS_KEY, &raw)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| MedrecError::RecordNotFound(id.to_string()))
    }

    fn uid_taken_by_other(&self, uid: &str, id: &str) -> bool {
        self.records.iter().any(|r| r.uid == uid && r.id != id)
    }
}

impl<B: StorageBackend> RecordRepository for RecordStore<B> {
    fn records(&self) -> &[MedicalRecord] {
        &self.records
    }

    fn storage(&self) -> &dyn StorageBackend {
        &self.backend
    }

    fn add(&mut self, mut record: MedicalRecord, actor: &str) -> Result<&MedicalRecord> {
        if self.contains_uid(&record.uid) {
            return Err(MedrecError::DuplicateUid(record.uid));
        }
        record.stamp_created(actor, Utc::now());
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        log::info!("added record {}", self.records[0].id);
        Ok(&self.records[0])
    }

    fn update(
        &mut self,
        id: &str,
        field: RecordField,
        value: &str,
        actor: &str,
    ) -> Result<&MedicalRecord> {
        let pos = self.position(id)?;
        if !field.is_editable() {
            return Err(MedrecError::FieldNotEditable(field));
        }
        validate_field(field, value)?;
        if field == RecordField::Uid && self.uid_taken_by_other(value, id) {
            return Err(MedrecError::DuplicateUid(value.to_string()));
        }

        let previous = self.records[pos].clone();
        let record = &mut self.records[pos];
        record.set_field(field, value)?;
        record.stamp_updated(actor, Utc::now());
        if let Err(e) = self.persist() {
            self.records[pos] = previous;
            return Err(e);
        }
        log::info!("updated {} on record {}", field, id);
        Ok(&self.records[pos])
    }

    fn delete(&mut self, id: &str) -> Result<MedicalRecord> {
        let pos = self.position(id)?;
        let removed = self.records.remove(pos);
        if let Err(e) = self.persist() {
            self.records.insert(pos, removed);
            return Err(e);
        }
        log::info!("deleted record {}", id);
        Ok(removed)
    }

    fn undo_delete(&mut self, record: MedicalRecord) -> Result<()> {
        let id = record.id.clone();
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        log::info!("restored record {}", id);
        Ok(())
    }

    fn insert_imported(&mut self, records: Vec<MedicalRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let count = records.len();
        let previous = std::mem::replace(&mut self.records, records);
        self.records.extend(previous.iter().cloned());
        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }
        log::info!("imported {} records", count);
        Ok(())
    }
}
