use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::Record;

use super::eligibility::{is_eligible, is_watched};

/// Orders series members by position, then by case-insensitive title
pub fn series_order_cmp(a: &Record, b: &Record) -> Ordering {
    a.series_position()
        .total_cmp(&b.series_position())
        .then_with(|| a.title_key().cmp(&b.title_key()))
}

/// Earliest member of a series that has not been watched yet.
///
/// Drop state is irrelevant here; only watched-ness decides.
pub fn earliest_unwatched<'a, I>(members: I) -> Option<(&'a str, &'a Record)>
where
    I: IntoIterator<Item = (&'a str, &'a Record)>,
{
    let mut members: Vec<_> = members.into_iter().collect();
    members.sort_by(|(_, a), (_, b)| series_order_cmp(a, b));
    members.into_iter().find(|(_, record)| !is_watched(record))
}

/// Collapses every series to its earliest unwatched entry.
///
/// Standalone records pass through when eligible. A series contributes at most one
/// record and nothing at all once every member has been watched.
pub fn reduce_series<'a, I>(entries: I) -> Vec<(&'a str, &'a Record)>
where
    I: IntoIterator<Item = (&'a str, &'a Record)>,
{
    let mut reduced = Vec::new();
    let mut groups: BTreeMap<String, Vec<(&'a str, &'a Record)>> = BTreeMap::new();

    for (id, record) in entries {
        match record.series_key() {
            Some(key) => groups.entry(key).or_default().push((id, record)),
            None if is_eligible(record) => reduced.push((id, record)),
            None => {}
        }
    }

    for (series, members) in groups {
        match earliest_unwatched(members) {
            Some(entry) => reduced.push(entry),
            None => tracing::trace!(series = %series, "Series fully watched"),
        }
    }

    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListSnapshot;

    fn snapshot(records: Vec<(&str, Record)>) -> ListSnapshot {
        records
            .into_iter()
            .map(|(id, record)| (id.to_string(), record))
            .collect()
    }

    fn reduce(snapshot: &ListSnapshot) -> Vec<&str> {
        let mut ids: Vec<&str> = reduce_series(snapshot.iter().map(|(id, r)| (id.as_str(), r)))
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_standalone_records_filtered_by_eligibility() {
        let data = snapshot(vec![
            ("a", Record::titled("Heat").with_status("Planned")),
            ("b", Record::titled("Ronin").with_status("Dropped")),
            ("c", Record::titled("Thief").with_status("Completed")),
        ]);
        assert_eq!(reduce(&data), vec!["a"]);
    }

    #[test]
    fn test_series_contributes_earliest_unwatched() {
        let data = snapshot(vec![
            ("p1", Record::titled("Alien").in_series("Alien", 1).with_status("Completed")),
            ("p2", Record::titled("Aliens").in_series("alien ", 2)),
            ("p3", Record::titled("Alien 3").in_series("ALIEN", 3)),
        ]);
        assert_eq!(reduce(&data), vec!["p2"]);
    }

    #[test]
    fn test_dropped_member_still_blocks_later_entries() {
        // A dropped entry is unwatched, so it still represents the series
        let data = snapshot(vec![
            ("p1", Record::titled("One").in_series("Saga", 1).with_status("Dropped")),
            ("p2", Record::titled("Two").in_series("Saga", 2)),
        ]);
        assert_eq!(reduce(&data), vec!["p1"]);
    }

    #[test]
    fn test_fully_watched_series_contributes_nothing() {
        let data = snapshot(vec![
            ("p1", Record::titled("One").in_series("Saga", 1).with_watched(true)),
            ("p2", Record::titled("Two").in_series("Saga", 2).with_status("watched")),
            ("x", Record::titled("Solo")),
        ]);
        assert_eq!(reduce(&data), vec!["x"]);
    }

    #[test]
    fn test_unparseable_order_sorts_last_and_ties_break_on_title() {
        let data = snapshot(vec![
            ("late", Record::titled("Zeta").in_series("Saga", "special")),
            ("b", Record::titled("beta").in_series("Saga", 1)),
            ("a", Record::titled("Alpha").in_series("Saga", 1)),
        ]);
        assert_eq!(reduce(&data), vec!["a"]);
    }

    #[test]
    fn test_at_most_one_member_per_series() {
        let data = snapshot(vec![
            ("a1", Record::titled("A1").in_series("A", 1)),
            ("a2", Record::titled("A2").in_series("A", 2)),
            ("b1", Record::titled("B1").in_series("B", 1)),
            ("b2", Record::titled("B2").in_series("b", 2)),
        ]);
        assert_eq!(reduce(&data), vec!["a1", "b1"]);
    }
}
