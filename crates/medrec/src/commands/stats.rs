use crate::commands::{CmdResult, StatsReport};
use crate::error::Result;
use crate::stats::{blood_group_distribution, registrations, summarize, TimeRange};
use crate::store::RecordRepository;
use chrono::NaiveDate;

pub fn run<R: RecordRepository>(store: &R, range: TimeRange, today: NaiveDate) -> Result<CmdResult> {
    let records = store.records();
    let report = StatsReport {
        summary: summarize(records),
        blood_groups: blood_group_distribution(records)
            .into_iter()
            .map(|(group, count)| (group.to_string(), count))
            .collect(),
        registrations: registrations(records, range, today),
    };
    Ok(CmdResult {
        stats: Some(report),
        ..Default::default()
    })
}
