use crate::codec::{self, export_filename, ImportFormat};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::RecordRepository;
use crate::table::{filter_records, FilterSet};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes the records passing `filters`, in store order. With no
/// filters that is every record.
pub fn render<R: RecordRepository>(
    store: &R,
    format: ImportFormat,
    filters: &FilterSet,
) -> Result<(String, usize)> {
    let rows: Vec<_> = filter_records(store.records(), filters)
        .into_iter()
        .cloned()
        .collect();
    let text = codec::export(format, &rows)?;
    Ok((text, rows.len()))
}

/// `<dir>/patient_records_<date>.<ext>`
pub fn default_path(dir: &Path, format: ImportFormat, today: NaiveDate) -> PathBuf {
    dir.join(export_filename(format, today))
}

pub fn run<R: RecordRepository>(
    store: &R,
    format: ImportFormat,
    filters: &FilterSet,
    path: &Path,
) -> Result<CmdResult> {
    let (text, count) = render(store, format, filters)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    log::info!("exported {} records to {}", count, path.display());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Records exported as {}", format)));
    if count == 0 {
        result.add_message(CmdMessage::warning("No records matched; the file is empty"));
    } else {
        result.add_message(CmdMessage::info(format!(
            "{} records written to {}",
            count,
            path.display()
        )));
    }
    result.written_paths.push(path.to_path_buf());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordField;
    use crate::store::memory::fixtures::StoreFixture;
    use tempfile::TempDir;

    #[test]
    fn writes_dated_file() {
        let fixture = StoreFixture::new().with_records(3);
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let path = default_path(dir.path(), ImportFormat::Json, date);

        let result = run(&fixture.store, ImportFormat::Json, &FilterSet::new(), &path).unwrap();
        assert_eq!(result.written_paths, vec![dir.path().join("patient_records_2024-01-31.json")]);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Patient 3"));
    }

    #[test]
    fn exports_only_filtered_rows() {
        let fixture = StoreFixture::new().with_records(3);
        let filters = FilterSet::new().with(RecordField::Name, "patient 2");
        let (text, count) = render(&fixture.store, ImportFormat::Csv, &filters).unwrap();
        assert_eq!(count, 1);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\"Patient 2\""));
    }

    #[test]
    fn empty_csv_export_is_empty_file() {
        let fixture = StoreFixture::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let result = run(&fixture.store, ImportFormat::Csv, &FilterSet::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(result.has_level(crate::commands::MessageLevel::Warning));
    }
}
