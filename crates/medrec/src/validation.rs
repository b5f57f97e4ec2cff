//! # Validation Rules
//!
//! Pure, side-effect-free predicates for the formatted fields of a record.
//! Nothing here looks at store state: uniqueness of `uid` is the store's job.
//!
//! The predicates treat every input literally. Optional fields (phone,
//! emergency contact) are allowed to be empty, but that decision belongs to
//! the callers ([`validate_field`], [`validate_new_record`]), not to
//! [`is_valid_phone_number`] itself.

use crate::model::{BloodGroup, MedicalRecord, NewRecord, RecordField};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const NAME_MAX_CHARS: usize = 50;

static UID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{11}$").expect("valid regex"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{10,}$").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required and must be at most 50 characters")]
    Name,

    #[error("UID must be exactly 11 digits")]
    Uid,

    #[error("Please enter a valid phone number")]
    Phone,

    #[error("Please enter a valid emergency contact number")]
    EmergencyContact,

    #[error("Unknown blood group: {0}")]
    BloodGroup(String),
}

/// True iff `uid` is exactly 11 ASCII decimal digits.
pub fn is_valid_uid(uid: &str) -> bool {
    UID_REGEX.is_match(uid)
}

/// True iff `phone` is an optional leading `+` followed by at least ten
/// digits, spaces or hyphens.
pub fn is_valid_phone_number(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    len > 0 && len <= NAME_MAX_CHARS
}

fn optional_phone(value: &str, err: ValidationError) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_phone_number(value) {
        Ok(())
    } else {
        Err(err)
    }
}

/// Checks a single field value the way the entry form does. Fields without
/// format rules always pass.
pub fn validate_field(field: RecordField, value: &str) -> Result<(), ValidationError> {
    match field {
        RecordField::Name if !is_valid_name(value) => Err(ValidationError::Name),
        RecordField::Uid if !is_valid_uid(value) => Err(ValidationError::Uid),
        RecordField::Phone => optional_phone(value, ValidationError::Phone),
        RecordField::EmergencyContact => {
            optional_phone(value, ValidationError::EmergencyContact)
        }
        RecordField::BloodGroup => value.parse::<BloodGroup>().map(|_| ()),
        _ => Ok(()),
    }
}

pub fn validate_new_record(record: &NewRecord) -> Result<(), ValidationError> {
    validate_field(RecordField::Name, &record.name)?;
    validate_field(RecordField::Uid, &record.uid)?;
    validate_field(RecordField::Phone, &record.phone)?;
    validate_field(RecordField::EmergencyContact, &record.emergency_contact)?;
    Ok(())
}

/// Applies the entry-form rules to a record that did not come through the
/// form, e.g. an imported row.
pub fn validate_record(record: &MedicalRecord) -> Result<(), ValidationError> {
    validate_field(RecordField::Name, &record.name)?;
    validate_field(RecordField::Uid, &record.uid)?;
    validate_field(RecordField::Phone, &record.phone)?;
    validate_field(RecordField::EmergencyContact, &record.emergency_contact)?;
    Ok(())
}
