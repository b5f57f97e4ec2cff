use crate::commands::CmdResult;
use crate::error::{MedrecError, Result};
use crate::index::{display_record, resolve, RecordSelector};
use crate::store::RecordRepository;

pub fn run<R: RecordRepository>(store: &R, selector: &RecordSelector) -> Result<CmdResult> {
    let pos = resolve(store.records(), selector)?;
    let shown = display_record(store.records(), pos)
        .ok_or_else(|| MedrecError::RecordNotFound(selector.to_string()))?;
    Ok(CmdResult::default().with_listed_records(vec![shown]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{fixture_uid, StoreFixture};

    #[test]
    fn shows_by_index_and_uid() {
        let fixture = StoreFixture::new().with_records(3);
        let by_index = run(&fixture.store, &RecordSelector::Index(3)).unwrap();
        assert_eq!(by_index.listed_records[0].record.name, "Patient 1");

        let by_uid = run(&fixture.store, &RecordSelector::Uid(fixture_uid(2))).unwrap();
        assert_eq!(by_uid.listed_records[0].index, 2);
    }

    #[test]
    fn missing_record_is_an_error() {
        let fixture = StoreFixture::new().with_records(1);
        assert!(run(&fixture.store, &RecordSelector::Index(5)).is_err());
    }
}
