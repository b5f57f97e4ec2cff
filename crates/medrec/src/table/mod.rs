//! # Records Table Engine
//!
//! Derives a display-ready page of records from the full record set:
//!
//! ```text
//! records ──► filter (per-field substrings + search) ──► sort ──► paginate ──► TableView
//! ```
//!
//! Every stage preserves the relative order it received, so with no sort
//! directive the page shows records in store order (newest first).
//!
//! - **Filtering**: a record passes when, for every non-empty filter, the
//!   lower-cased field value contains the lower-cased filter text. Filters
//!   combine with AND; fields without a filter are unconstrained.
//! - **Sorting**: lower-cased field values compared lexicographically. The
//!   sort is stable.
//! - **Pagination**: `[page_size * (page - 1), page_size * page)`. A page
//!   past the end is an empty slice, never an error.
//!
//! [`TableState`] carries the UI-facing rules: changing any filter jumps
//! back to page 1, and sorting by the same column twice flips direction.
//!
//! The [`edit`] submodule holds the per-cell inline edit state machine.

use crate::model::{MedicalRecord, RecordField};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

pub mod edit;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fields the free-text search box looks at.
pub const SEARCH_FIELDS: [RecordField; 7] = [
    RecordField::Name,
    RecordField::Uid,
    RecordField::Phone,
    RecordField::BloodGroup,
    RecordField::Address,
    RecordField::MedicalHistory,
    RecordField::Notes,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: RecordField,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(key: RecordField) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: RecordField) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

/// Presentation state of the table. Never persisted with the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortConfig>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl TableConfig {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    /// Clicking the column currently sorted ascending flips it to descending;
    /// any other click sorts ascending by `key`.
    pub fn toggle_sort(&mut self, key: RecordField) {
        let direction = match self.sort {
            Some(SortConfig {
                key: current,
                direction: SortDirection::Asc,
            }) if current == key => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortConfig { key, direction });
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

/// Per-field substring filters plus an optional free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    fields: BTreeMap<RecordField, String>,
    search: String,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: RecordField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets the filter for `field`; an empty value removes it.
    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.fields.get(&field).map(|s| s.as_str())
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.search.trim().is_empty()
    }

    pub fn matches(&self, record: &MedicalRecord) -> bool {
        let field_ok = self.fields.iter().all(|(field, needle)| {
            needle.is_empty() || contains_ci(&record.field_value(*field), needle)
        });
        if !field_ok {
            return false;
        }
        let query = self.search.trim();
        query.is_empty()
            || SEARCH_FIELDS
                .iter()
                .any(|f| contains_ci(&record.field_value(*f), query))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn filter_records<'a>(records: &'a [MedicalRecord], filters: &FilterSet) -> Vec<&'a MedicalRecord> {
    records.iter().filter(|r| filters.matches(r)).collect()
}

/// Stable sort by the lower-cased value of the sort key. `None` keeps order.
pub fn sort_records(rows: &mut [&MedicalRecord], sort: Option<&SortConfig>) {
    let Some(sort) = sort else {
        return;
    };
    match sort.direction {
        SortDirection::Asc => rows.sort_by_cached_key(|r| r.field_value(sort.key).to_lowercase()),
        // Ties stay in store order; reversing the slice would flip them.
        SortDirection::Desc => {
            rows.sort_by_cached_key(|r| Reverse(r.field_value(sort.key).to_lowercase()))
        }
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// The `page`th slice (1-based) of `rows`. Out-of-range pages are empty.
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a MedicalRecord>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Records that passed the filters, across all pages.
    pub total_matches: usize,
    /// Offset of `rows[0]` within the filtered, sorted set.
    pub start_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableView<'a> {
    /// The store itself is empty; shown instead of an empty table.
    NoRecords,
    Page(PageView<'a>),
}

/// Runs the full pipeline.
pub fn build_view<'a>(
    records: &'a [MedicalRecord],
    filters: &FilterSet,
    config: &TableConfig,
) -> TableView<'a> {
    if records.is_empty() {
        return TableView::NoRecords;
    }
    let mut rows = filter_records(records, filters);
    sort_records(&mut rows, config.sort.as_ref());

    let page_size = config.page_size.max(1);
    let page = config.page.max(1);
    let visible = paginate(&rows, page, page_size).to_vec();
    TableView::Page(PageView {
        rows: visible,
        page,
        page_size,
        total_pages: total_pages(rows.len(), page_size),
        total_matches: rows.len(),
        start_index: (page - 1) * page_size,
    })
}

/// Filters and table configuration together, enforcing the interaction
/// rules between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    pub config: TableConfig,
    pub filters: FilterSet,
}

impl TableState {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            filters: FilterSet::new(),
        }
    }

    pub fn set_filter(&mut self, field: RecordField, value: impl Into<String>) {
        self.filters.set(field, value);
        self.config.page = 1;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filters.set_search(query);
        self.config.page = 1;
    }

    pub fn sort_by(&mut self, key: RecordField) {
        self.config.toggle_sort(key);
    }

    pub fn view<'a>(&self, records: &'a [MedicalRecord]) -> TableView<'a> {
        build_view(records, &self.filters, &self.config)
    }
}
