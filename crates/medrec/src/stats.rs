//! Summary figures over the record set: totals, blood-group mix, BMI and
//! registrations over time.
//!
//! Everything here is a pure function of the records (and, for time series,
//! of "today"). Empty inputs produce zero counts, never made-up numbers.

use crate::model::{BloodGroup, MedicalRecord};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub total_records: usize,
    pub common_blood_group: Option<BloodGroup>,
    /// Mean BMI over records with usable height and weight, one decimal.
    pub average_bmi: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
        };
        f.write_str(s)
    }
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi <= 25.0 {
        BmiCategory::Normal
    } else {
        BmiCategory::Overweight
    }
}

fn positive(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Height in centimetres, weight in kilograms.
pub fn bmi(record: &MedicalRecord) -> Option<f64> {
    let height = positive(&record.height)? / 100.0;
    let weight = positive(&record.weight)?;
    Some(weight / (height * height))
}

pub fn summarize(records: &[MedicalRecord]) -> RecordStats {
    let common_blood_group = blood_group_distribution(records)
        .into_iter()
        .fold(None, |best: Option<(BloodGroup, usize)>, (group, count)| {
            match best {
                Some((_, top)) if top >= count => best,
                _ => Some((group, count)),
            }
        })
        .map(|(group, _)| group);

    let bmis: Vec<f64> = records.iter().filter_map(bmi).collect();
    let average_bmi = if bmis.is_empty() {
        None
    } else {
        let mean = bmis.iter().sum::<f64>() / bmis.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    RecordStats {
        total_records: records.len(),
        common_blood_group,
        average_bmi,
    }
}

/// Count per blood group in [`BloodGroup::ALL`] order, omitting zeros.
pub fn blood_group_distribution(records: &[MedicalRecord]) -> Vec<(BloodGroup, usize)> {
    BloodGroup::ALL
        .into_iter()
        .map(|g| (g, records.iter().filter(|r| r.blood_group == g).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// Last 7 days, one bucket per day.
    Week,
    /// Last 4 weeks, one bucket per 7 days.
    Month,
    /// Last 12 calendar months.
    Year,
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            other => Err(format!("unknown time range '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Accepts `YYYY-MM-DD` and anything starting with it, such as an RFC 3339
/// timestamp.
fn created_on(record: &MedicalRecord) -> Option<NaiveDate> {
    let prefix = record.created_at.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Registrations per bucket, oldest bucket first. Records with an
/// unreadable `createdAt` are not counted.
pub fn registrations(records: &[MedicalRecord], range: TimeRange, today: NaiveDate) -> Vec<Bucket> {
    let dates: Vec<NaiveDate> = records.iter().filter_map(created_on).collect();
    let count_between = |from: NaiveDate, to: NaiveDate| {
        dates.iter().filter(|d| **d >= from && **d <= to).count()
    };

    match range {
        TimeRange::Week => (0..7)
            .rev()
            .map(|back| {
                let day = today - Duration::days(back);
                Bucket {
                    label: day.format("%a").to_string(),
                    count: count_between(day, day),
                }
            })
            .collect(),
        TimeRange::Month => (0..4)
            .map(|i| {
                let end = today - Duration::days(7 * (3 - i));
                let start = end - Duration::days(6);
                Bucket {
                    label: format!("Week {}", i + 1),
                    count: count_between(start, end),
                }
            })
            .collect(),
        TimeRange::Year => {
            let this_month = today.with_day(1).unwrap_or(today);
            (0..12)
                .rev()
                .map(|back| {
                    let month = this_month
                        .checked_sub_months(Months::new(back))
                        .unwrap_or(this_month);
                    Bucket {
                        label: month.format("%b").to_string(),
                        count: dates
                            .iter()
                            .filter(|d| d.year() == month.year() && d.month() == month.month())
                            .count(),
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewRecord;
    use chrono::Utc;

    fn rec(blood: BloodGroup, height: &str, weight: &str, created: &str) -> MedicalRecord {
        let mut new = NewRecord::new("x", "12345678901");
        new.blood_group = blood;
        new.height = height.into();
        new.weight = weight.into();
        let mut r = MedicalRecord::from_new(new, Utc::now());
        r.created_at = created.into();
        r
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_summary_has_no_placeholders() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.common_blood_group, None);
        assert_eq!(stats.average_bmi, None);
    }

    #[test]
    fn summary_counts_and_averages() {
        let records = vec![
            rec(BloodGroup::OPositive, "180", "81", "2024-01-01"),
            rec(BloodGroup::OPositive, "160", "64", "2024-01-01"),
            rec(BloodGroup::ANegative, "abc", "70", "2024-01-01"),
            rec(BloodGroup::ANegative, "170", "0", "2024-01-01"),
        ];
        let stats = summarize(&records);
        assert_eq!(stats.total_records, 4);
        // 81/1.8^2 = 25.0, 64/1.6^2 = 25.0
        assert_eq!(stats.average_bmi, Some(25.0));
        // 2 vs 2: A- precedes O+ in enum order.
        assert_eq!(stats.common_blood_group, Some(BloodGroup::ANegative));
    }

    #[test]
    fn distribution_omits_empty_groups() {
        let records = vec![
            rec(BloodGroup::BPositive, "", "", ""),
            rec(BloodGroup::APositive, "", "", ""),
            rec(BloodGroup::BPositive, "", "", ""),
        ];
        assert_eq!(
            blood_group_distribution(&records),
            vec![(BloodGroup::APositive, 1), (BloodGroup::BPositive, 2)]
        );
    }

    #[test]
    fn bmi_categories_use_inclusive_normal_range() {
        assert_eq!(bmi_category(18.4), BmiCategory::Underweight);
        assert_eq!(bmi_category(18.5), BmiCategory::Normal);
        assert_eq!(bmi_category(25.0), BmiCategory::Normal);
        assert_eq!(bmi_category(25.1), BmiCategory::Overweight);
    }

    #[test]
    fn weekly_buckets_end_today() {
        let today = day("2024-05-15");
        let records = vec![
            rec(BloodGroup::APositive, "", "", "2024-05-15"),
            rec(BloodGroup::APositive, "", "", "2024-05-09T08:00:00.000Z"),
            rec(BloodGroup::APositive, "", "", "2024-05-08"),
            rec(BloodGroup::APositive, "", "", "garbage"),
        ];
        let buckets = registrations(&records, TimeRange::Week, today);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Thu");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[6].label, "Wed");
        assert_eq!(buckets[6].count, 1);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn monthly_buckets_cover_four_weeks() {
        let today = day("2024-05-28");
        let records = vec![
            rec(BloodGroup::APositive, "", "", "2024-05-01"),
            rec(BloodGroup::APositive, "", "", "2024-05-22"),
            rec(BloodGroup::APositive, "", "", "2024-05-28"),
        ];
        let buckets = registrations(&records, TimeRange::Month, today);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 2]);
        assert_eq!(buckets[3].label, "Week 4");
    }

    #[test]
    fn yearly_buckets_are_calendar_months() {
        let today = day("2024-03-10");
        let records = vec![
            rec(BloodGroup::APositive, "", "", "2023-04-30"),
            rec(BloodGroup::APositive, "", "", "2023-03-31"),
            rec(BloodGroup::APositive, "", "", "2024-03-01"),
        ];
        let buckets = registrations(&records, TimeRange::Year, today);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "Apr");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[11].label, "Mar");
        assert_eq!(buckets[11].count, 1);
    }

    #[test]
    fn empty_series_is_all_zero() {
        let buckets = registrations(&[], TimeRange::Year, day("2024-03-10"));
        assert!(buckets.iter().all(|b| b.count == 0));
    }
}
