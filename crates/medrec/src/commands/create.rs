use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{MedicalRecord, NewRecord};
use crate::store::RecordRepository;
use crate::validation::validate_new_record;
use chrono::Utc;

pub fn run<R: RecordRepository>(store: &mut R, new: NewRecord, actor: &str) -> Result<CmdResult> {
    validate_new_record(&new)?;
    let record = MedicalRecord::from_new(new, Utc::now());
    let added = store.add(record, actor)?.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Record added successfully"));
    result.affected_records.push(added);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MedrecError;
    use crate::store::memory::InMemoryStore;
    use crate::validation::ValidationError;

    #[test]
    fn creates_record_at_head() {
        let mut store = InMemoryStore::new();
        run(&mut store, NewRecord::new("First", "11111111111"), "admin").unwrap();
        let result = run(&mut store, NewRecord::new("Second", "22222222222"), "admin").unwrap();

        assert_eq!(result.affected_records[0].name, "Second");
        assert_eq!(store.records()[0].name, "Second");
        assert_eq!(result.messages[0].content, "Record added successfully");
    }

    #[test]
    fn invalid_form_never_reaches_store() {
        let mut store = InMemoryStore::new();
        let err = run(&mut store, NewRecord::new("Ada", "123"), "admin").unwrap_err();
        assert!(matches!(err, MedrecError::Validation(ValidationError::Uid)));

        let mut new = NewRecord::new("Ada", "12345678901");
        new.phone = "12".into();
        assert!(run(&mut store, new, "admin").is_err());
        assert!(store.records().is_empty());
    }

    #[test]
    fn duplicate_uid_is_rejected() {
        let mut store = InMemoryStore::new();
        run(&mut store, NewRecord::new("Ada", "12345678901"), "admin").unwrap();
        let err = run(&mut store, NewRecord::new("Eve", "12345678901"), "admin").unwrap_err();
        assert_eq!(err.to_string(), "A record with UID 12345678901 already exists");
        assert_eq!(store.records().len(), 1);
    }
}
