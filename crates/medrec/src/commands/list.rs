use crate::commands::{index_rows, CmdMessage, CmdResult, PageInfo};
use crate::error::Result;
use crate::store::RecordRepository;
use crate::table::{TableState, TableView};

/// One page of the records table under the given filters and sort.
pub fn run<R: RecordRepository>(store: &R, state: &TableState) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match state.view(store.records()) {
        TableView::NoRecords => {
            result.add_message(CmdMessage::info(
                "No records yet. Add a patient record to get started.",
            ));
        }
        TableView::Page(page) => {
            if page.rows.is_empty() {
                let msg = if page.total_matches == 0 {
                    "No records match the current filters"
                } else {
                    "Page is past the last page of results"
                };
                result.add_message(CmdMessage::info(msg));
            }
            result.listed_records = index_rows(store, &page.rows);
            result.page = Some(PageInfo {
                page: page.page,
                page_size: page.page_size,
                total_pages: page.total_pages,
                total_matches: page.total_matches,
                total_records: store.records().len(),
            });
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordField;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use crate::table::TableConfig;

    #[test]
    fn empty_store_reports_no_records() {
        let store = InMemoryStore::new();
        let result = run(&store, &TableState::default()).unwrap();
        assert!(result.page.is_none());
        assert!(result.listed_records.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn lists_first_page_newest_first() {
        let fixture = StoreFixture::new().with_records(25);
        let result = run(&fixture.store, &TableState::default()).unwrap();
        let page = result.page.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_records, 25);
        assert_eq!(result.listed_records.len(), 10);
        assert_eq!(result.listed_records[0].index, 1);
        assert_eq!(result.listed_records[0].record.name, "Patient 25");
    }

    #[test]
    fn indexes_stay_canonical_under_filter_and_sort() {
        let fixture = StoreFixture::new().with_records(12);
        let mut state = TableState::new(TableConfig::with_page_size(5));
        state.set_filter(RecordField::Name, "Patient 1");
        state.sort_by(RecordField::Name);
        let result = run(&fixture.store, &state).unwrap();

        // "Patient 1", "Patient 10", "Patient 11", "Patient 12" in ascending order.
        let shown: Vec<(usize, &str)> = result
            .listed_records
            .iter()
            .map(|d| (d.index, d.record.name.as_str()))
            .collect();
        assert_eq!(
            shown,
            vec![
                (12, "Patient 1"),
                (3, "Patient 10"),
                (2, "Patient 11"),
                (1, "Patient 12")
            ]
        );
    }

    #[test]
    fn filtered_to_nothing_explains_itself() {
        let fixture = StoreFixture::new().with_records(3);
        let mut state = TableState::default();
        state.set_filter(RecordField::Name, "nobody");
        let result = run(&fixture.store, &state).unwrap();
        assert_eq!(result.page.unwrap().total_matches, 0);
        assert_eq!(
            result.messages[0].content,
            "No records match the current filters"
        );
    }
}
