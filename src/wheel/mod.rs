//! The decision wheel
//!
//! Picks one unwatched entry from a list (or from every list), never recommending a
//! sequel before its predecessor, and reveals it through an eased countdown.
pub mod audio;
pub mod display;
pub mod eligibility;
pub mod pool;
pub mod redirect;
pub mod series;
pub mod session;
pub mod timeline;

pub use audio::{AudioCue, AudioError, LoggedCue};
pub use display::{DisplayLease, SpinnerView, WheelSurface, WheelView};
pub use eligibility::{is_eligible, is_watched};
pub use pool::{build_list_pool, build_pool, LoadedLists};
pub use redirect::resolve_redirect;
pub use series::reduce_series;
pub use session::{
    CancelReason, SpinOutcome, SpinReport, SpinState, WheelController, EMPTY_ALL_MESSAGE,
    EMPTY_LIST_MESSAGE,
};
pub use timeline::{ease_out_cubic, Tick, Timeline};
