//! # Record Identifiers: Display Index, UID and Id
//!
//! Records carry a UUID `id`, which is correct but tedious to type, and an
//! 11-digit patient `uid`. The CLI additionally numbers records by their
//! position in the store (newest = 1).
//!
//! ## Canonical Ordering
//!
//! The display index always refers to a record's position in the full,
//! unfiltered store, never to its row on the current page. Filtering or
//! sorting the table does not renumber anything, so `medrec show 4` targets
//! the same record whatever view printed the `4`.
//!
//! ## Selector Grammar
//!
//! [`RecordSelector`] parses user input:
//!
//! - exactly 11 digits: a patient UID (`12345678901`)
//! - any other run of digits: a display index (`1`, `42`)
//! - anything else: a prefix of the record id (`3f2a`)
//!
//! An id prefix must match exactly one record.

use crate::error::{MedrecError, Result};
use crate::model::MedicalRecord;
use crate::validation::is_valid_uid;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    Index(usize),
    Uid(String),
    IdPrefix(String),
}

impl FromStr for RecordSelector {
    type Err = MedrecError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MedrecError::RecordNotFound(String::new()));
        }
        if is_valid_uid(s) {
            return Ok(RecordSelector::Uid(s.to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(n) if n > 0 => Ok(RecordSelector::Index(n)),
                _ => Err(MedrecError::RecordNotFound(s.to_string())),
            };
        }
        Ok(RecordSelector::IdPrefix(s.to_lowercase()))
    }
}

impl fmt::Display for RecordSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSelector::Index(i) => write!(f, "{}", i),
            RecordSelector::Uid(uid) => write!(f, "{}", uid),
            RecordSelector::IdPrefix(p) => write!(f, "{}", p),
        }
    }
}

/// A record paired with its canonical display index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub index: usize,
    pub record: MedicalRecord,
}

/// Position of `selector` in `records`, 0-based.
pub fn resolve(records: &[MedicalRecord], selector: &RecordSelector) -> Result<usize> {
    let not_found = || MedrecError::RecordNotFound(selector.to_string());
    match selector {
        RecordSelector::Index(n) => {
            if *n <= records.len() {
                Ok(n - 1)
            } else {
                Err(not_found())
            }
        }
        RecordSelector::Uid(uid) => records
            .iter()
            .position(|r| &r.uid == uid)
            .ok_or_else(not_found),
        RecordSelector::IdPrefix(prefix) => {
            let mut hits = records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.id.to_lowercase().starts_with(prefix.as_str()))
                .map(|(i, _)| i);
            match (hits.next(), hits.next()) {
                (Some(i), None) => Ok(i),
                (None, _) => Err(not_found()),
                (Some(_), Some(_)) => Err(MedrecError::AmbiguousSelector(prefix.clone())),
            }
        }
    }
}

pub fn display_record(records: &[MedicalRecord], position: usize) -> Option<DisplayRecord> {
    records.get(position).map(|record| DisplayRecord {
        index: position + 1,
        record: record.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewRecord;
    use chrono::Utc;

    fn records() -> Vec<MedicalRecord> {
        let mut a = MedicalRecord::from_new(NewRecord::new("A", "11111111111"), Utc::now());
        a.id = "aaaa-0001".into();
        let mut b = MedicalRecord::from_new(NewRecord::new("B", "22222222222"), Utc::now());
        b.id = "aaab-0002".into();
        vec![a, b]
    }

    #[test]
    fn selector_grammar() {
        assert_eq!(
            "2".parse::<RecordSelector>().unwrap(),
            RecordSelector::Index(2)
        );
        assert_eq!(
            "12345678901".parse::<RecordSelector>().unwrap(),
            RecordSelector::Uid("12345678901".into())
        );
        assert_eq!(
            "AAAB".parse::<RecordSelector>().unwrap(),
            RecordSelector::IdPrefix("aaab".into())
        );
        assert!("0".parse::<RecordSelector>().is_err());
        assert!("".parse::<RecordSelector>().is_err());
    }

    #[test]
    fn resolves_each_kind() {
        let records = records();
        assert_eq!(resolve(&records, &RecordSelector::Index(2)).unwrap(), 1);
        assert_eq!(
            resolve(&records, &RecordSelector::Uid("11111111111".into())).unwrap(),
            0
        );
        assert_eq!(
            resolve(&records, &RecordSelector::IdPrefix("aaab".into())).unwrap(),
            1
        );
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        assert!(matches!(
            resolve(&records(), &RecordSelector::Index(3)),
            Err(MedrecError::RecordNotFound(_))
        ));
    }

    #[test]
    fn ambiguous_prefix_is_rejected() {
        assert!(matches!(
            resolve(&records(), &RecordSelector::IdPrefix("aaa".into())),
            Err(MedrecError::AmbiguousSelector(_))
        ));
    }
}
