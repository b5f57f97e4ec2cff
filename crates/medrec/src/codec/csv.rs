use super::ImportBatch;
use crate::error::{MedrecError, Result};
use crate::model::MedicalRecord;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Columns that deserialize to `Option`; an empty cell means "unset".
const OPTIONAL_COLUMNS: [&str; 4] = ["dateOfBirth", "lastUpdated", "createdBy", "updatedBy"];

/// Header is the key list of the first record, which every record shares
/// since unset optionals serialize as null; every value is quoted with
/// embedded quotes doubled. Rows are joined with `\n`, no trailing newline.
///
/// Values containing newlines are written as-is and will not survive a
/// re-import.
pub fn export_csv(records: &[MedicalRecord]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let headers: Vec<String> = match serde_json::to_value(first)? {
        Value::Object(object) => object.keys().cloned().collect(),
        _ => Vec::new(),
    };

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(headers.join(","));
    for record in records {
        let value = serde_json::to_value(record)?;
        let row: Vec<String> = headers
            .iter()
            .map(|key| quote(value.get(key)))
            .collect();
        lines.push(row.join(","));
    }
    Ok(lines.join("\n"))
}

fn quote(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    format!("\"{}\"", text.replace('"', "\"\""))
}

pub fn import_csv(text: &str, now: DateTime<Utc>) -> Result<ImportBatch> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if lines.len() < 2 {
        return Err(MedrecError::Parse("CSV file is empty or invalid".into()));
    }

    let headers: Vec<&str> = lines[0].split(',').map(str::trim).collect();
    let mut rows = Vec::new();
    for line in lines[1..].iter().filter(|l| !l.trim().is_empty()) {
        let values = split_csv_line(line);
        if values.len() != headers.len() {
            return Err(MedrecError::Parse(
                "CSV format error: mismatch between headers and values".into(),
            ));
        }
        let mut object = Map::new();
        for (header, value) in headers.iter().zip(values) {
            if value.is_empty() && OPTIONAL_COLUMNS.contains(header) {
                continue;
            }
            object.insert(header.to_string(), Value::String(value));
        }
        rows.push(object);
    }

    let mut batch = ImportBatch::default();
    for (index, object) in rows.into_iter().enumerate() {
        batch.push(index + 1, object, now);
    }
    Ok(batch)
}

/// Splits one CSV line on commas outside double quotes. Quote characters
/// toggle the quoted state and are dropped; inside quotes a doubled quote is
/// a literal `"`.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if inside_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    values.push(current);
    values
}
