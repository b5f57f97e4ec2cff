use super::mem_backend::MemBackend;
use super::record_store::RecordStore;

pub type InMemoryStore = RecordStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        RecordStore::load(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{BloodGroup, MedicalRecord, NewRecord};
    use crate::store::RecordRepository;
    use chrono::Utc;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Deterministic 11-digit UID for fixture number `n`.
    pub fn fixture_uid(n: usize) -> String {
        format!("{:011}", 10_000_000_000u64 + n as u64)
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds `count` records named "Patient 1".."Patient N". Since adds
        /// prepend, "Patient N" ends up first.
        pub fn with_records(mut self, count: usize) -> Self {
            for i in 0..count {
                let mut new = NewRecord::new(format!("Patient {}", i + 1), fixture_uid(i + 1));
                new.blood_group = BloodGroup::ALL[i % BloodGroup::ALL.len()];
                self.store
                    .add(MedicalRecord::from_new(new, Utc::now()), "fixture")
                    .unwrap();
            }
            self
        }

        pub fn with_record(mut self, new: NewRecord) -> Self {
            self.store
                .add(MedicalRecord::from_new(new, Utc::now()), "fixture")
                .unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{fixture_uid, StoreFixture};
    use crate::store::RecordRepository;
    use crate::validation::is_valid_uid;

    #[test]
    fn fixture_uids_are_valid_and_distinct() {
        assert!(is_valid_uid(&fixture_uid(1)));
        assert_ne!(fixture_uid(1), fixture_uid(2));
    }

    #[test]
    fn fixture_records_are_newest_first() {
        let fixture = StoreFixture::new().with_records(3);
        let names: Vec<&str> = fixture
            .store
            .records()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Patient 3", "Patient 2", "Patient 1"]);
    }
}
