use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{Candidate, ListSnapshot, ListType};
use crate::services::actor_filter::ActorFilters;

use super::eligibility::is_eligible;
use super::series::reduce_series;

/// Raw snapshots loaded for one spin, keyed by list
pub type LoadedLists = BTreeMap<ListType, Arc<ListSnapshot>>;

/// Builds the candidates one list contributes to the wheel.
///
/// The actor filter runs first, then series reduction (or plain eligibility for
/// standalone lists). The result is sorted by title so picks are reproducible.
pub fn build_list_pool(
    list_type: ListType,
    snapshot: &ListSnapshot,
    filters: &ActorFilters,
) -> Vec<Candidate> {
    let filter_value = filters.active_value(list_type);
    let admitted = snapshot
        .iter()
        .filter(|(_, record)| match filter_value.as_deref() {
            Some(value) => ActorFilters::matches(record, value),
            None => true,
        })
        .map(|(id, record)| (id.as_str(), record));

    let selected: Vec<_> = if list_type.is_series_bearing() {
        reduce_series(admitted)
    } else {
        admitted.filter(|(_, record)| is_eligible(record)).collect()
    };

    let mut pool: Vec<Candidate> = selected
        .into_iter()
        .map(|(id, record)| Candidate::new(list_type, id, record.clone()))
        .collect();
    pool.sort_by(|a, b| {
        a.record
            .title_key()
            .cmp(&b.record.title_key())
            .then_with(|| a.id.cmp(&b.id))
    });
    pool
}

/// Concatenates every loaded list's candidates, in list order
pub fn build_pool(lists: &LoadedLists, filters: &ActorFilters) -> Vec<Candidate> {
    lists
        .iter()
        .flat_map(|(list_type, snapshot)| build_list_pool(*list_type, snapshot, filters))
        .collect()
}
