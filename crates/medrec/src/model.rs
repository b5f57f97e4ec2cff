//! Core data types: [`MedicalRecord`], [`BloodGroup`], [`RecordField`] and the
//! [`NewRecord`] form payload.
//!
//! Records serialize with camelCase keys in declaration order. That order is
//! load-bearing: CSV export takes its header row from the keys of the first
//! record, so reordering fields here reorders exported columns.

use crate::error::{MedrecError, Result};
use crate::validation::ValidationError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// ABO/Rh blood type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BloodGroup {
    #[default]
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        BloodGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| ValidationError::BloodGroup(s.to_string()))
    }
}

/// A field of [`MedicalRecord`], named by its serialized key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    Id,
    Name,
    Uid,
    Phone,
    Address,
    Height,
    Weight,
    PictureUrl,
    BloodGroup,
    EmergencyContact,
    MedicalHistory,
    Notes,
    CreatedAt,
    DateOfBirth,
    LastUpdated,
    CreatedBy,
    UpdatedBy,
}

impl RecordField {
    pub const ALL: [RecordField; 17] = [
        RecordField::Id,
        RecordField::Name,
        RecordField::Uid,
        RecordField::Phone,
        RecordField::Address,
        RecordField::Height,
        RecordField::Weight,
        RecordField::PictureUrl,
        RecordField::BloodGroup,
        RecordField::EmergencyContact,
        RecordField::MedicalHistory,
        RecordField::Notes,
        RecordField::CreatedAt,
        RecordField::DateOfBirth,
        RecordField::LastUpdated,
        RecordField::CreatedBy,
        RecordField::UpdatedBy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Id => "id",
            RecordField::Name => "name",
            RecordField::Uid => "uid",
            RecordField::Phone => "phone",
            RecordField::Address => "address",
            RecordField::Height => "height",
            RecordField::Weight => "weight",
            RecordField::PictureUrl => "pictureUrl",
            RecordField::BloodGroup => "bloodGroup",
            RecordField::EmergencyContact => "emergencyContact",
            RecordField::MedicalHistory => "medicalHistory",
            RecordField::Notes => "notes",
            RecordField::CreatedAt => "createdAt",
            RecordField::DateOfBirth => "dateOfBirth",
            RecordField::LastUpdated => "lastUpdated",
            RecordField::CreatedBy => "createdBy",
            RecordField::UpdatedBy => "updatedBy",
        }
    }

    /// Identity, picture and provenance fields are never edited in place.
    pub fn is_editable(&self) -> bool {
        !matches!(
            self,
            RecordField::Id
                | RecordField::CreatedAt
                | RecordField::PictureUrl
                | RecordField::LastUpdated
                | RecordField::CreatedBy
                | RecordField::UpdatedBy
        )
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordField {
    type Err = MedrecError;

    /// Accepts the serialized key case-insensitively, so `bloodgroup` and
    /// `bloodGroup` both resolve.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        RecordField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MedrecError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalRecord {
    pub id: String,
    pub name: String,
    pub uid: String,
    pub phone: String,
    pub address: String,
    pub height: String,
    pub weight: String,
    pub picture_url: String,
    pub blood_group: BloodGroup,
    pub emergency_contact: String,
    pub medical_history: String,
    pub notes: String,
    pub created_at: String,
    // Unset optionals serialize as null so every record has the same keys.
    pub date_of_birth: Option<String>,
    pub last_updated: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl MedicalRecord {
    /// Builds a record from form data, assigning a fresh id and today's date.
    pub fn from_new(new: NewRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            uid: new.uid,
            phone: new.phone,
            address: new.address,
            height: new.height,
            weight: new.weight,
            picture_url: new.picture_url,
            blood_group: new.blood_group,
            emergency_contact: new.emergency_contact,
            medical_history: new.medical_history,
            notes: new.notes,
            created_at: now.format("%Y-%m-%d").to_string(),
            date_of_birth: new.date_of_birth,
            last_updated: None,
            created_by: None,
            updated_by: None,
        }
    }

    /// The field's value as displayed, filtered and sorted. Unset optional
    /// fields read as the empty string.
    pub fn field_value(&self, field: RecordField) -> String {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        match field {
            RecordField::Id => self.id.clone(),
            RecordField::Name => self.name.clone(),
            RecordField::Uid => self.uid.clone(),
            RecordField::Phone => self.phone.clone(),
            RecordField::Address => self.address.clone(),
            RecordField::Height => self.height.clone(),
            RecordField::Weight => self.weight.clone(),
            RecordField::PictureUrl => self.picture_url.clone(),
            RecordField::BloodGroup => self.blood_group.to_string(),
            RecordField::EmergencyContact => self.emergency_contact.clone(),
            RecordField::MedicalHistory => self.medical_history.clone(),
            RecordField::Notes => self.notes.clone(),
            RecordField::CreatedAt => self.created_at.clone(),
            RecordField::DateOfBirth => opt(&self.date_of_birth),
            RecordField::LastUpdated => opt(&self.last_updated),
            RecordField::CreatedBy => opt(&self.created_by),
            RecordField::UpdatedBy => opt(&self.updated_by),
        }
    }

    /// Replaces an editable field. Performs no uniqueness or format checks
    /// beyond what the field's type demands.
    pub fn set_field(&mut self, field: RecordField, value: &str) -> Result<()> {
        if !field.is_editable() {
            return Err(MedrecError::FieldNotEditable(field));
        }
        let value = value.to_string();
        match field {
            RecordField::Name => self.name = value,
            RecordField::Uid => self.uid = value,
            RecordField::Phone => self.phone = value,
            RecordField::Address => self.address = value,
            RecordField::Height => self.height = value,
            RecordField::Weight => self.weight = value,
            RecordField::BloodGroup => self.blood_group = value.parse()?,
            RecordField::EmergencyContact => self.emergency_contact = value,
            RecordField::MedicalHistory => self.medical_history = value,
            RecordField::Notes => self.notes = value,
            RecordField::DateOfBirth => {
                self.date_of_birth = if value.is_empty() { None } else { Some(value) }
            }
            _ => return Err(MedrecError::FieldNotEditable(field)),
        }
        Ok(())
    }

    pub fn stamp_created(&mut self, actor: &str, now: DateTime<Utc>) {
        self.created_by = Some(actor.to_string());
        self.stamp_updated(actor, now);
    }

    pub fn stamp_updated(&mut self, actor: &str, now: DateTime<Utc>) {
        self.updated_by = Some(actor.to_string());
        self.last_updated = Some(timestamp(now));
    }
}

/// Form payload for a new record: everything except identity and provenance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRecord {
    pub name: String,
    pub uid: String,
    pub phone: String,
    pub address: String,
    pub height: String,
    pub weight: String,
    pub picture_url: String,
    pub blood_group: BloodGroup,
    pub emergency_contact: String,
    pub medical_history: String,
    pub notes: String,
    pub date_of_birth: Option<String>,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: uid.into(),
            ..Default::default()
        }
    }
}

/// Provenance timestamp format: RFC 3339 with milliseconds, UTC.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
