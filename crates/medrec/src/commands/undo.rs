use crate::commands::{CmdMessage, CmdResult, UNDO_KEY};
use crate::error::{MedrecError, Result};
use crate::model::MedicalRecord;
use crate::store::RecordRepository;

/// Puts the most recently deleted record back at the head of the store.
///
/// The buffer outlives the process, so another record may have claimed the
/// uid since the delete. That undo is refused and the buffer kept.
pub fn run<R: RecordRepository>(store: &mut R) -> Result<CmdResult> {
    let raw = store
        .storage()
        .get(UNDO_KEY)?
        .ok_or(MedrecError::NothingToUndo)?;
    let record: MedicalRecord = serde_json::from_str(&raw)?;
    if store.contains_uid(&record.uid) {
        return Err(MedrecError::DuplicateUid(record.uid));
    }
    store.undo_delete(record.clone())?;
    store.storage().remove(UNDO_KEY)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Deletion undone"));
    result.affected_records.push(record);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, delete};
    use crate::index::RecordSelector;
    use crate::model::NewRecord;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn delete_then_undo_restores_exact_record() {
        let mut fixture = StoreFixture::new().with_records(3);
        let target = fixture.store.records()[1].clone();
        delete::run(&mut fixture.store, &RecordSelector::Index(2)).unwrap();

        run(&mut fixture.store).unwrap();
        assert_eq!(fixture.store.records()[0], target);
        assert_eq!(fixture.store.records().len(), 3);
    }

    #[test]
    fn undo_is_single_use() {
        let mut fixture = StoreFixture::new().with_records(1);
        delete::run(&mut fixture.store, &RecordSelector::Index(1)).unwrap();
        run(&mut fixture.store).unwrap();
        assert!(matches!(
            run(&mut fixture.store),
            Err(MedrecError::NothingToUndo)
        ));
    }

    #[test]
    fn only_the_latest_delete_is_buffered() {
        let mut fixture = StoreFixture::new().with_records(2);
        let first = fixture.store.records()[0].clone();
        let second = fixture.store.records()[1].clone();
        delete::run(&mut fixture.store, &RecordSelector::Index(1)).unwrap();
        delete::run(&mut fixture.store, &RecordSelector::Index(1)).unwrap();

        let result = run(&mut fixture.store).unwrap();
        assert_eq!(result.affected_records[0], second);
        assert!(!fixture.store.records().contains(&first));
    }

    #[test]
    fn undo_refused_when_uid_was_reused() {
        let mut fixture = StoreFixture::new().with_records(1);
        let deleted = delete::run(&mut fixture.store, &RecordSelector::Index(1)).unwrap();
        let uid = deleted.affected_records[0].uid.clone();
        create::run(&mut fixture.store, NewRecord::new("Other", uid.clone()), "admin").unwrap();

        let err = run(&mut fixture.store).unwrap_err();
        assert!(matches!(err, MedrecError::DuplicateUid(ref u) if *u == uid));
        assert_eq!(fixture.store.records().len(), 1);
        assert!(fixture.store.storage().get(UNDO_KEY).unwrap().is_some());
    }
}
