use crate::models::Record;

const WATCHED_PREFIXES: [&str; 2] = ["complete", "watched"];
const DROPPED_PREFIX: &str = "drop";

/// Whether the record counts as already seen.
///
/// An explicit `watched` boolean always wins over the status text.
pub fn is_watched(record: &Record) -> bool {
    if let Some(watched) = record.explicit_watched() {
        return watched;
    }
    let status = record.normalized_status();
    WATCHED_PREFIXES
        .iter()
        .any(|prefix| status.starts_with(prefix))
}

/// Whether the user gave up on the record
pub fn is_dropped(record: &Record) -> bool {
    record.normalized_status().starts_with(DROPPED_PREFIX)
}

/// Whether the record may be recommended by the wheel
pub fn is_eligible(record: &Record) -> bool {
    !is_watched(record) && !is_dropped(record)
}
