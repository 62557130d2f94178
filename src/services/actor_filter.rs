use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::{ListType, Record};

/// Per-list "show only titles with this actor" filters
#[derive(Debug, Default)]
pub struct ActorFilters {
    values: RwLock<HashMap<ListType, String>>,
}

impl ActorFilters {
    /// Sets the filter for a list; a blank value clears it.
    ///
    /// Returns `false` for lists that have no actor filter.
    pub fn set(&self, list_type: ListType, value: &str) -> bool {
        if !list_type.supports_actor_filter() {
            return false;
        }
        let value = value.trim().to_lowercase();
        let mut values = self.values.write();
        if value.is_empty() {
            values.remove(&list_type);
        } else {
            values.insert(list_type, value);
        }
        true
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }

    /// The normalized filter value, if the list has one set
    pub fn active_value(&self, list_type: ListType) -> Option<String> {
        if !list_type.supports_actor_filter() {
            return None;
        }
        self.values.read().get(&list_type).cloned()
    }

    /// Case-insensitive substring match against any of the record's actors
    pub fn matches(record: &Record, value: &str) -> bool {
        let needle = value.trim().to_lowercase();
        record
            .actor_names()
            .iter()
            .any(|actor| actor.to_lowercase().contains(&needle))
    }

    /// Whether the record survives the list's current filter
    pub fn admits(&self, list_type: ListType, record: &Record) -> bool {
        match self.active_value(list_type) {
            Some(value) => Self::matches(record, &value),
            None => true,
        }
    }
}
