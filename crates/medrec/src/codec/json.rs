use super::ImportBatch;
use crate::error::{MedrecError, Result};
use crate::model::MedicalRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Only the first record is checked for these; later rows are on their own.
const REQUIRED_FIELDS: [&str; 3] = ["name", "uid", "bloodGroup"];

/// Pretty-printed (2-space) array, keys in record declaration order.
pub fn export_json(records: &[MedicalRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn import_json(text: &str, now: DateTime<Utc>) -> Result<ImportBatch> {
    let parsed: Value =
        serde_json::from_str(text).map_err(|e| MedrecError::Parse(e.to_string()))?;
    let items = match parsed {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(MedrecError::Parse(
                "Invalid JSON format: no records found".into(),
            ))
        }
    };

    let first = items[0].as_object();
    for field in REQUIRED_FIELDS {
        if !first.is_some_and(|obj| obj.contains_key(field)) {
            return Err(MedrecError::Parse(format!(
                "Invalid record format: missing {} field",
                field
            )));
        }
    }

    let mut batch = ImportBatch::default();
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(object) => batch.push(index + 1, object, now),
            other => batch.rejected.push(super::RejectedRow {
                row: index + 1,
                reason: format!("expected an object, found {}", kind(&other)),
            }),
        }
    }
    Ok(batch)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{timestamp, BloodGroup, NewRecord};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn record(name: &str, uid: &str) -> MedicalRecord {
        let mut new = NewRecord::new(name, uid);
        new.blood_group = BloodGroup::BNegative;
        new.notes = "line one\nline \"two\"".into();
        let mut r = MedicalRecord::from_new(new, now());
        r.stamp_created("admin", now());
        r
    }

    #[test]
    fn export_is_pretty_printed() {
        let out = export_json(&[record("Ada", "12345678901")]).unwrap();
        assert!(out.starts_with("[\n  {\n    \"id\""));
    }

    #[test]
    fn round_trip_preserves_records_except_last_updated() {
        let records = vec![record("Ada", "12345678901"), record("Grace", "10987654321")];
        let text = export_json(&records).unwrap();
        let later = now() + chrono::Duration::days(1);
        let batch = import_json(&text, later).unwrap();

        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records.len(), 2);
        for (original, imported) in records.iter().zip(&batch.records) {
            assert_eq!(imported.last_updated.as_deref(), Some(timestamp(later).as_str()));
            let mut expected = original.clone();
            expected.last_updated = imported.last_updated.clone();
            assert_eq!(imported, &expected);
        }
    }

    #[test]
    fn missing_created_at_and_id_are_filled() {
        let text = r#"[{"name":"Ada","uid":"12345678901","bloodGroup":"O+"}]"#;
        let batch = import_json(text, now()).unwrap();
        let r = &batch.records[0];
        assert_eq!(r.created_at, "2024-05-01");
        assert!(!r.id.is_empty());
        assert_eq!(r.blood_group, BloodGroup::OPositive);
    }

    #[test]
    fn numeric_measurements_are_read_as_text() {
        let text = r#"[{"name":"Ada","uid":"12345678901","bloodGroup":"O+","height":170,"weight":62.5}]"#;
        let batch = import_json(text, now()).unwrap();
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records[0].height, "170");
        assert_eq!(batch.records[0].weight, "62.5");
    }

    #[test]
    fn empty_array_is_rejected() {
        let err = import_json("[]", now()).unwrap_err();
        assert_eq!(err.to_string(), "Import failed: Invalid JSON format: no records found");
        assert!(import_json("{\"name\":\"x\"}", now()).is_err());
    }

    #[test]
    fn first_record_must_have_required_fields() {
        let text = r#"[{"name":"Ada","uid":"12345678901"}]"#;
        let err = import_json(text, now()).unwrap_err();
        assert!(err.to_string().contains("missing bloodGroup field"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            import_json("[{", now()),
            Err(MedrecError::Parse(_))
        ));
    }

    #[test]
    fn bad_rows_are_rejected_individually() {
        let text = r#"[
            {"name":"Ada","uid":"12345678901","bloodGroup":"O+"},
            {"name":"Bad","uid":"10987654321","bloodGroup":"Z+"},
            42
        ]"#;
        let batch = import_json(text, now()).unwrap();
        assert_eq!(batch.records.len(), 1);
        let rows: Vec<usize> = batch.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 3]);
    }
}
