//! # Rendering Module
//!
//! Turns command results into terminal text. Every function here returns a
//! `String`; printing is left to the handlers in `commands.rs`, which keeps
//! the renderers testable on canned values.
//!
//! ## Table Layout
//!
//! The list view is a fixed-width table. Each row has:
//! - `index` (5 chars): canonical display index ("  3.")
//! - `name` (fill): patient name, truncated to fit
//! - `uid` (12 chars)
//! - `blood` (4 chars)
//! - `phone` (16 chars)
//! - `updated` (14 chars, right-aligned): relative "last updated" time
//!
//! Widths are measured with `unicode-width`, so names with wide characters
//! still line up.
//!
//! ## Structured Output
//!
//! With `--json` the handlers print [`result_value`] instead: the records,
//! page info and messages as plain JSON, without any styling.

use super::styles;
use chrono::{DateTime, Utc};
use medrec::api::{CmdMessage, MessageLevel, PageInfo, StatsReport};
use medrec::auth::User;
use medrec::commands::CmdResult;
use medrec::index::DisplayRecord;
use medrec::model::{MedicalRecord, RecordField};
use medrec::stats::{bmi, bmi_category};
use serde_json::{json, Value};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;

const COL_INDEX: usize = 5;
const COL_UID: usize = 12;
const COL_BLOOD: usize = 4;
const COL_PHONE: usize = 16;
const COL_TIME: usize = 14;
const BAR_WIDTH: usize = 30;

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &*styles::INFO,
            MessageLevel::Success => &*styles::SUCCESS,
            MessageLevel::Warning => &*styles::WARNING,
            MessageLevel::Error => &*styles::ERROR,
        };
        out.push_str(&style.apply_to(&message.content).to_string());
        out.push('\n');
    }
    out
}

/// Table of listed records, a page footer, then the messages.
pub fn render_list(result: &CmdResult) -> String {
    let mut out = String::new();
    if !result.listed_records.is_empty() {
        let name_width = name_column_width();
        out.push_str(
            &styles::MUTED
                .apply_to(format!(
                    "{}{}{}{}{}{}",
                    pad_to_width("#", COL_INDEX),
                    pad_to_width("Name", name_width),
                    pad_to_width("UID", COL_UID),
                    pad_to_width("BG", COL_BLOOD),
                    pad_to_width("Phone", COL_PHONE),
                    format!("{:>width$}", "Updated", width = COL_TIME),
                ))
                .to_string(),
        );
        out.push('\n');
        for row in &result.listed_records {
            out.push_str(&render_row(row, name_width));
            out.push('\n');
        }
    }
    if let Some(page) = &result.page {
        if page.total_matches > 0 {
            out.push_str(&styles::FAINT.apply_to(page_footer(page)).to_string());
            out.push('\n');
        }
    }
    out.push_str(&render_messages(&result.messages));
    out
}

fn name_column_width() -> usize {
    LINE_WIDTH.saturating_sub(COL_INDEX + COL_UID + COL_BLOOD + COL_PHONE + COL_TIME)
}

fn render_row(row: &DisplayRecord, name_width: usize) -> String {
    let record = &row.record;
    let index = format!("{:>3}. ", row.index);
    let name = truncate_to_width(&record.name, name_width.saturating_sub(1));
    let phone = truncate_to_width(&record.phone, COL_PHONE.saturating_sub(1));
    let updated = record
        .last_updated
        .as_deref()
        .map(format_time_ago)
        .unwrap_or_default();

    format!(
        "{}{}{}{}{}{}",
        styles::INDEX.apply_to(pad_to_width(&index, COL_INDEX)),
        styles::TITLE.apply_to(pad_to_width(&name, name_width)),
        pad_to_width(&record.uid, COL_UID),
        pad_to_width(record.blood_group.as_str(), COL_BLOOD),
        pad_to_width(&phone, COL_PHONE),
        styles::TIME.apply_to(format!("{:>width$}", updated, width = COL_TIME)),
    )
}

fn page_footer(page: &PageInfo) -> String {
    let mut footer = format!(
        "Page {} of {} · showing {} of {} matching",
        page.page,
        page.total_pages,
        shown_on_page(page),
        page.total_matches
    );
    if page.total_matches != page.total_records {
        footer.push_str(&format!(" ({} records total)", page.total_records));
    }
    footer
}

fn shown_on_page(page: &PageInfo) -> usize {
    let start = (page.page - 1).saturating_mul(page.page_size);
    page.total_matches.saturating_sub(start).min(page.page_size)
}

/// Every field of one record, labelled, with the BMI when it can be computed.
pub fn render_record(row: &DisplayRecord) -> String {
    let record = &row.record;
    let mut out = format!(
        "{} {}\n",
        styles::INDEX.apply_to(format!("{}.", row.index)),
        styles::TITLE.apply_to(&record.name)
    );
    out.push_str(&styles::FAINT.apply_to("-".repeat(40)).to_string());
    out.push('\n');

    let label_width = RecordField::ALL
        .iter()
        .map(|f| f.as_str().width())
        .max()
        .unwrap_or(0);
    for field in RecordField::ALL {
        if field == RecordField::Name {
            continue;
        }
        let value = record.field_value(field);
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "{} {}\n",
            styles::LABEL.apply_to(pad_to_width(field.as_str(), label_width)),
            value
        ));
    }
    if let Some(line) = bmi_line(record) {
        out.push_str(&format!(
            "{} {}\n",
            styles::LABEL.apply_to(pad_to_width("bmi", label_width)),
            line
        ));
    }
    out
}

fn bmi_line(record: &MedicalRecord) -> Option<String> {
    bmi(record).map(|value| format!("{:.1} ({})", value, bmi_category(value)))
}

pub fn render_user(user: &User) -> String {
    let mut out = format!(
        "{} {}\n",
        styles::TITLE.apply_to(&user.name),
        styles::MUTED.apply_to(format!("({})", user.username))
    );
    out.push_str(&format!("{} {}\n", styles::LABEL.apply_to("email"), user.email));
    out.push_str(&format!(
        "{} {}\n",
        styles::LABEL.apply_to("role "),
        serde_json::to_value(user.role)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    ));
    out
}

pub fn render_stats(report: &StatsReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        styles::LABEL.apply_to("Total records     "),
        summary.total_records
    ));
    out.push_str(&format!(
        "{} {}\n",
        styles::LABEL.apply_to("Common blood group"),
        summary
            .common_blood_group
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    out.push_str(&format!(
        "{} {}\n",
        styles::LABEL.apply_to("Average BMI       "),
        summary
            .average_bmi
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string())
    ));

    if !report.blood_groups.is_empty() {
        out.push('\n');
        out.push_str(&styles::TITLE.apply_to("Blood groups").to_string());
        out.push('\n');
        let max = report.blood_groups.iter().map(|(_, c)| *c).max().unwrap_or(0);
        for (group, count) in &report.blood_groups {
            out.push_str(&bar_line(group, *count, max, 4));
        }
    }

    out.push('\n');
    out.push_str(&styles::TITLE.apply_to("Registrations").to_string());
    out.push('\n');
    let max = report.registrations.iter().map(|b| b.count).max().unwrap_or(0);
    let label_width = report
        .registrations
        .iter()
        .map(|b| b.label.width())
        .max()
        .unwrap_or(0);
    for bucket in &report.registrations {
        out.push_str(&bar_line(&bucket.label, bucket.count, max, label_width));
    }
    out
}

fn bar_line(label: &str, count: usize, max: usize, label_width: usize) -> String {
    let len = if max == 0 { 0 } else { count * BAR_WIDTH / max };
    format!(
        "{} {} {}\n",
        pad_to_width(label, label_width),
        styles::INDEX.apply_to("█".repeat(len)),
        count
    )
}

/// Structured form of a command result for `--json`.
pub fn result_value(action: &str, result: &CmdResult) -> Value {
    let mut value = json!({
        "action": action,
        "messages": result.messages,
    });
    if !result.affected_records.is_empty() {
        value["records"] = json!(result.affected_records);
    }
    if !result.listed_records.is_empty() || result.page.is_some() {
        value["rows"] = json!(result.listed_records);
    }
    if let Some(page) = &result.page {
        value["page"] = json!(page);
    }
    if !result.written_paths.is_empty() {
        value["paths"] = json!(result.written_paths);
    }
    if let Some(stats) = &result.stats {
        value["stats"] = json!(stats);
    }
    if let Some(user) = &result.user {
        value["user"] = json!(user);
    }
    value
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

/// "3 hours ago" for an RFC 3339 timestamp. Unparseable input is shown as is.
fn format_time_ago(timestamp: &str) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let elapsed = Utc::now().signed_duration_since(parsed.with_timezone(&Utc));
    Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}
