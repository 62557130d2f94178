use std::time::Duration;

use crate::config::WheelConfig;
use crate::models::Candidate;

/// Number of filler ticks contributed per pool entry
const TICKS_PER_CANDIDATE: usize = 5;

/// One step of the spin animation
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub candidate: Candidate,
    /// Offset from the start of the animation
    pub delay: Duration,
}

/// Precomputed animation for one spin
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub ticks: Vec<Tick>,
    /// When the acceleration sound should start, `None` when there is nothing to animate
    pub audio_cue: Option<Duration>,
}

impl Timeline {
    /// Builds the decelerating walk for a spin.
    ///
    /// Filler ticks walk `pool` circularly starting at `chosen_index`; the final tick
    /// always shows `resolved`, which may differ from the entry at `chosen_index`.
    pub fn build(
        pool: &[Candidate],
        chosen_index: usize,
        resolved: Candidate,
        config: &WheelConfig,
    ) -> Self {
        let fillers = if pool.is_empty() {
            0
        } else {
            config.min_ticks.max(pool.len() * TICKS_PER_CANDIDATE)
        };

        let mut items: Vec<Candidate> = (0..fillers)
            .map(|step| pool[(chosen_index + step) % pool.len()].clone())
            .collect();
        items.push(resolved);

        let total = items.len();
        let total_ms = config.spin_duration.as_millis() as f64;
        let ticks: Vec<Tick> = items
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| Tick {
                candidate,
                delay: tick_delay(index, total, total_ms),
            })
            .collect();

        let audio_cue = audio_anchor_index(ticks.len(), config.audio_trigger_fraction)
            .map(|anchor| ticks[anchor].delay.saturating_sub(config.audio_lead_in));

        Self { ticks, audio_cue }
    }

    /// Offset of the final tick
    pub fn duration(&self) -> Duration {
        self.ticks.last().map(|tick| tick.delay).unwrap_or_default()
    }
}

/// Cubic ease-out: fast start, slow finish
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

fn tick_delay(index: usize, total: usize, total_ms: f64) -> Duration {
    let last = total.saturating_sub(1);
    if last == 0 {
        return Duration::ZERO;
    }
    let progress = index as f64 / last as f64;
    Duration::from_millis((ease_out_cubic(progress) * total_ms).round() as u64)
}

/// Tick the audio cue is anchored to: `clamp(floor(n * fraction), 1, n - 1)`
fn audio_anchor_index(tick_count: usize, fraction: f64) -> Option<usize> {
    match tick_count {
        0 => None,
        1 => Some(0),
        n => Some(((n as f64 * fraction).floor() as usize).clamp(1, n - 1)),
    }
}
