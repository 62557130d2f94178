use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{ListSnapshot, ListType, Record};

use super::actor_filter::ActorFilters;

/// Fallback year so undated entries sort after dated ones
const UNKNOWN_YEAR: i64 = 9999;

/// How a list is ordered for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Title,
    YearAsc,
    YearDesc,
    Director,
    Series,
}

/// A record as shown in a list view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub id: String,
    #[serde(flatten)]
    pub record: Record,
}

/// Applies the list's actor filter and sorts what remains
pub fn prepare_entries(
    list_type: ListType,
    snapshot: &ListSnapshot,
    filters: &ActorFilters,
    mode: SortMode,
) -> Vec<ListEntry> {
    let mut entries: Vec<ListEntry> = snapshot
        .iter()
        .filter(|(_, record)| filters.admits(list_type, record))
        .map(|(id, record)| ListEntry {
            id: id.clone(),
            record: record.clone(),
        })
        .collect();
    entries.sort_by(|a, b| compare(&a.record, &b.record, mode));
    entries
}

fn compare(a: &Record, b: &Record, mode: SortMode) -> Ordering {
    let by_title = a.title_key().cmp(&b.title_key());
    match mode {
        SortMode::Title => by_title,
        SortMode::YearAsc | SortMode::YearDesc => {
            let ya = a.year_number().unwrap_or(UNKNOWN_YEAR);
            let yb = b.year_number().unwrap_or(UNKNOWN_YEAR);
            let by_year = if mode == SortMode::YearAsc {
                ya.cmp(&yb)
            } else {
                yb.cmp(&ya)
            };
            by_year.then(by_title)
        }
        SortMode::Director => credit_key(a).cmp(&credit_key(b)).then(by_title),
        SortMode::Series => {
            let sa = a.series_key().unwrap_or_default();
            let sb = b.series_key().unwrap_or_default();
            sa.cmp(&sb)
                .then_with(|| a.series_position().total_cmp(&b.series_position()))
                .then(by_title)
        }
    }
}

/// Director for screen media, author for books
fn credit_key(record: &Record) -> String {
    record
        .director
        .as_deref()
        .or(record.author.as_deref())
        .unwrap_or("")
        .to_lowercase()
}
