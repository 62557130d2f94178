use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use crate::services::result_card::ResultCard;

/// Spinner element state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpinnerView {
    pub visible: bool,
    pub spinning: bool,
    /// Title of the most recent tick
    pub text: String,
}

/// Everything the wheel panel currently shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WheelView {
    pub spinner: SpinnerView,
    pub result: Option<ResultCard>,
    pub message: Option<String>,
}

#[derive(Debug, Default)]
struct SurfaceInner {
    /// Generation of the session allowed to write
    owner: Option<u64>,
    view: WheelView,
}

/// The spinner and result elements of one wheel panel.
///
/// Only the session holding the current lease can change what is shown.
#[derive(Debug, Default)]
pub struct WheelSurface {
    inner: Mutex<SurfaceInner>,
}

impl WheelSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copy of what is on screen right now
    pub fn view(&self) -> WheelView {
        self.inner.lock().view.clone()
    }

    /// Hands the surface to `generation` and clears the previous spin's output
    pub fn claim(self: &Arc<Self>, generation: u64) -> DisplayLease {
        let mut inner = self.inner.lock();
        inner.owner = Some(generation);
        inner.view = WheelView::default();
        DisplayLease {
            surface: Arc::clone(self),
            generation,
        }
    }

    /// Clears the panel and revokes every outstanding lease
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.owner = None;
        inner.view = WheelView::default();
    }
}

/// Write access to the surface for one spin session
#[derive(Debug, Clone)]
pub struct DisplayLease {
    surface: Arc<WheelSurface>,
    generation: u64,
}

impl DisplayLease {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Applies `update` if this lease still owns the surface
    fn update(&self, update: impl FnOnce(&mut WheelView)) -> bool {
        let mut inner = self.surface.inner.lock();
        if inner.owner != Some(self.generation) {
            return false;
        }
        update(&mut inner.view);
        true
    }

    pub fn start_spinner(&self) -> bool {
        self.update(|view| {
            view.spinner = SpinnerView {
                visible: true,
                spinning: true,
                text: String::new(),
            };
            view.result = None;
            view.message = None;
        })
    }

    /// Replaces the spinner text with the current tick's title
    pub fn show_pick(&self, title: &str) -> bool {
        self.update(|view| view.spinner.text = title.to_string())
    }

    /// Stops the spinner and renders the final result
    pub fn settle(&self, card: ResultCard) -> bool {
        self.update(|view| {
            view.spinner.spinning = false;
            view.result = Some(card);
        })
    }

    /// Stops the spinner and shows a message in place of a result
    pub fn show_message(&self, message: &str) -> bool {
        self.update(|view| {
            view.spinner.spinning = false;
            view.spinner.visible = false;
            view.result = None;
            view.message = Some(message.to_string());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_clears_previous_output() {
        let surface = WheelSurface::new();
        let first = surface.claim(1);
        first.start_spinner();
        first.show_message("No eligible items");

        let second = surface.claim(2);
        assert_eq!(surface.view(), WheelView::default());
        assert!(!first.show_pick("Heat"));
        assert!(second.show_pick("Ronin"));
        assert_eq!(surface.view().spinner.text, "Ronin");
    }

    #[test]
    fn test_stale_lease_cannot_write() {
        let surface = WheelSurface::new();
        let stale = surface.claim(1);
        let current = surface.claim(2);
        current.start_spinner();
        current.show_pick("Heat");

        assert!(!stale.show_pick("Ronin"));
        assert!(!stale.show_message("boom"));
        assert_eq!(surface.view().spinner.text, "Heat");
    }

    #[test]
    fn test_reset_revokes_lease() {
        let surface = WheelSurface::new();
        let lease = surface.claim(5);
        lease.start_spinner();
        surface.reset();
        assert!(!lease.show_pick("Heat"));
        assert!(!surface.view().spinner.visible);
    }
}
