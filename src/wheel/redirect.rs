use crate::models::{Candidate, ListSnapshot};

use super::eligibility::is_watched;
use super::series::earliest_unwatched;

/// Swaps a pick for an earlier unseen entry of the same series.
///
/// Siblings come from the raw snapshot of the pick's list, not from the pool, so the
/// actor filter does not apply here. Standalone picks and picks with no unwatched
/// sibling are returned unchanged.
pub fn resolve_redirect(chosen: &Candidate, raw: &ListSnapshot) -> Candidate {
    if !chosen.list_type.is_series_bearing() {
        return chosen.clone();
    }
    let Some(series) = chosen.record.series_key() else {
        return chosen.clone();
    };

    let siblings = raw
        .iter()
        .filter(|(_, record)| record.series_key().as_deref() == Some(series.as_str()))
        .map(|(id, record)| (id.as_str(), record));

    let Some((earliest_id, earliest)) = earliest_unwatched(siblings) else {
        return chosen.clone();
    };
    if earliest_id == chosen.id {
        return chosen.clone();
    }

    let out_of_order = chosen.record.series_position() > earliest.series_position();
    if out_of_order || is_watched(&chosen.record) {
        tracing::debug!(
            series = %series,
            from = %chosen.id,
            to = %earliest_id,
            "Redirecting pick to earlier series entry"
        );
        return Candidate::new(chosen.list_type, earliest_id, earliest.clone());
    }

    chosen.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListType, Record};

    fn raw(records: Vec<(&str, Record)>) -> ListSnapshot {
        records
            .into_iter()
            .map(|(id, record)| (id.to_string(), record))
            .collect()
    }

    fn candidate(list_type: ListType, id: &str, data: &ListSnapshot) -> Candidate {
        Candidate::new(list_type, id, data[id].clone())
    }

    #[test]
    fn test_later_entry_redirects_to_earliest_unwatched() {
        let data = raw(vec![
            ("a", Record::titled("A").in_series("Saga", 1)),
            ("b", Record::titled("B").in_series("Saga", 2)),
        ]);
        let resolved = resolve_redirect(&candidate(ListType::Movies, "b", &data), &data);
        assert_eq!(resolved.id, "a");
        assert_eq!(resolved.title(), "A");
    }

    #[test]
    fn test_resolving_earliest_is_idempotent() {
        let data = raw(vec![
            ("a", Record::titled("A").in_series("Saga", 1).with_status("Completed")),
            ("b", Record::titled("B").in_series("Saga", 2)),
            ("c", Record::titled("C").in_series("Saga", 3)),
        ]);
        let chosen = candidate(ListType::TvShows, "b", &data);
        let once = resolve_redirect(&chosen, &data);
        assert_eq!(once, chosen);
        assert_eq!(resolve_redirect(&once, &data), once);
    }

    #[test]
    fn test_watched_pick_redirects_even_when_earlier() {
        let data = raw(vec![
            ("a", Record::titled("A").in_series("Saga", 1).with_watched(true)),
            ("b", Record::titled("B").in_series("Saga", 2)),
        ]);
        let resolved = resolve_redirect(&candidate(ListType::Anime, "a", &data), &data);
        assert_eq!(resolved.id, "b");
    }

    #[test]
    fn test_no_unwatched_sibling_keeps_pick() {
        let data = raw(vec![
            ("a", Record::titled("A").in_series("Saga", 1).with_watched(true)),
            ("b", Record::titled("B").in_series("Saga", 2).with_watched(true)),
        ]);
        let chosen = candidate(ListType::Movies, "b", &data);
        assert_eq!(resolve_redirect(&chosen, &data), chosen);
    }

    #[test]
    fn test_books_never_redirect() {
        let data = raw(vec![
            ("a", Record::titled("A").in_series("Saga", 1)),
            ("b", Record::titled("B").in_series("Saga", 2)),
        ]);
        let chosen = candidate(ListType::Books, "b", &data);
        assert_eq!(resolve_redirect(&chosen, &data), chosen);
    }

    #[test]
    fn test_equal_order_is_not_out_of_order() {
        let data = raw(vec![
            ("a", Record::titled("A").in_series("Saga", 1)),
            ("b", Record::titled("B").in_series("saga", 1)),
        ]);
        let chosen = candidate(ListType::Movies, "b", &data);
        assert_eq!(resolve_redirect(&chosen, &data).id, "b");
    }

    #[test]
    fn test_redirect_ignores_actor_filter_state() {
        // The sibling is reachable even though nothing about it matched any filter
        let mut early = Record::titled("Early").in_series("Saga", 1);
        early.actors = Some(serde_json::json!(["Nobody"]));
        let data = raw(vec![
            ("early", early),
            ("late", Record::titled("Late").in_series("Saga", 2)),
        ]);
        let resolved = resolve_redirect(&candidate(ListType::Movies, "late", &data), &data);
        assert_eq!(resolved.id, "early");
    }
}
