use serde::Serialize;

use crate::models::{Candidate, ListType, Record};

/// Result panel contents for the wheel's final pick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub list_type: ListType,
    pub id: String,
    pub label: &'static str,
    pub title: String,
    pub status: Option<String>,
    /// e.g. "Alien #2"
    pub series: Option<String>,
    pub year: Option<i64>,
    pub notes: Option<String>,
    /// Plain-text fallback line
    pub summary: String,
}

impl ResultCard {
    pub fn render(list_type: ListType, id: &str, record: &Record) -> Self {
        Self {
            list_type,
            id: id.to_string(),
            label: list_type.label(),
            title: record.display_title().to_string(),
            status: non_blank(record.status.as_deref()),
            series: series_line(record),
            year: record.year_number(),
            notes: non_blank(record.notes.as_deref()),
            summary: plain_text(record),
        }
    }

    pub fn for_candidate(candidate: &Candidate) -> Self {
        Self::render(candidate.list_type, &candidate.id, &candidate.record)
    }
}

/// Text used when no card can be shown
pub fn plain_text(record: &Record) -> String {
    format!("You should watch/read: {}", record.display_title())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn series_line(record: &Record) -> Option<String> {
    let name = non_blank(record.series_name.as_deref())?;
    let order = record.series_position();
    if order.is_finite() {
        Some(format!("{} #{}", name, order))
    } else {
        Some(name)
    }
}
