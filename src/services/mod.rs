pub mod actor_filter;
pub mod listing;
pub mod result_card;
pub mod snapshots;

pub use actor_filter::ActorFilters;
pub use result_card::ResultCard;
pub use snapshots::{InMemorySource, RealtimeDbSource, SnapshotCache, SnapshotSource};
