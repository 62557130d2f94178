use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    config::WheelConfig,
    error::{AppError, AppResult, LOAD_FAILURE_MESSAGE},
    models::{Candidate, SpinTarget, UserSession},
    services::{ActorFilters, ResultCard, SnapshotSource},
};

use super::audio::{self, AudioCue};
use super::display::{DisplayLease, WheelSurface, WheelView};
use super::pool::{build_pool, LoadedLists};
use super::redirect::resolve_redirect;
use super::timeline::{Tick, Timeline};

pub const EMPTY_LIST_MESSAGE: &str =
    "No eligible items in this list yet. Add something or update a status!";
pub const EMPTY_ALL_MESSAGE: &str =
    "No eligible items across your lists yet. Add something to spin!";

/// Why a spin ended without settling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EmptyPool,
    LoadFailed,
    Superseded,
    TornDown,
}

/// Lifecycle of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum SpinState {
    Idle,
    Loading,
    Animating,
    Settled,
    Cancelled(CancelReason),
}

/// What a spin request led to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SpinOutcome {
    /// The countdown is running and will settle on `pick`
    Animating {
        pool_size: usize,
        /// Entry drawn from the pool before series redirection
        chosen: Candidate,
        pick: Candidate,
        redirected: bool,
        tick_count: usize,
        duration_ms: u64,
        audio_cue_ms: Option<u64>,
    },
    /// Nothing was eligible
    Empty { message: String },
    /// A newer spin or a teardown took over while this one was loading
    Superseded,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpinReport {
    pub spin_id: Uuid,
    pub target: String,
    pub started_at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: SpinOutcome,
}

/// Timers belonging to the spin currently in flight
#[derive(Debug)]
struct SpinSession {
    id: Uuid,
    ticks: Option<JoinHandle<()>>,
    audio: Option<JoinHandle<()>>,
}

impl SpinSession {
    fn cancel(self) {
        if let Some(ticks) = self.ticks {
            ticks.abort();
        }
        if let Some(audio) = self.audio {
            audio.abort();
        }
    }
}

#[derive(Debug)]
struct ControllerState {
    /// Bumped on every spin and teardown; stale sessions compare against it
    generation: u64,
    phase: SpinState,
    session: Option<SpinSession>,
}

/// Runs spins for one wheel panel, one at a time.
///
/// Every spin gets a fresh generation. Starting a spin or closing the wheel bumps the
/// generation, aborts the previous session's timers and revokes its display lease, so
/// nothing from an older spin can reach the panel afterwards.
pub struct WheelController {
    config: WheelConfig,
    source: Arc<dyn SnapshotSource>,
    filters: Arc<ActorFilters>,
    audio: Arc<dyn AudioCue>,
    surface: Arc<WheelSurface>,
    rng: Mutex<StdRng>,
    state: Arc<Mutex<ControllerState>>,
}

impl WheelController {
    pub fn new(
        config: WheelConfig,
        source: Arc<dyn SnapshotSource>,
        filters: Arc<ActorFilters>,
        audio: Arc<dyn AudioCue>,
    ) -> Self {
        Self {
            config,
            source,
            filters,
            audio,
            surface: WheelSurface::new(),
            rng: Mutex::new(StdRng::from_os_rng()),
            state: Arc::new(Mutex::new(ControllerState {
                generation: 0,
                phase: SpinState::Idle,
                session: None,
            })),
        }
    }

    /// Replaces the random source, for reproducible picks
    pub fn with_rng(self, rng: StdRng) -> Self {
        *self.rng.lock() = rng;
        self
    }

    pub fn state(&self) -> SpinState {
        self.state.lock().phase
    }

    pub fn view(&self) -> WheelView {
        self.surface.view()
    }

    /// Starts a spin over `source` ("all" or a list name).
    ///
    /// Returns once the countdown is scheduled; the result lands on the panel when
    /// the final tick fires.
    pub async fn spin(&self, user: Option<&UserSession>, source: &str) -> AppResult<SpinReport> {
        let user = user.ok_or(AppError::NotAuthenticated)?;
        let target = SpinTarget::parse(source).map_err(AppError::InvalidTarget)?;

        let spin_id = Uuid::new_v4();
        let started_at = Utc::now();
        let report = |outcome| SpinReport {
            spin_id,
            target: target.to_string(),
            started_at,
            outcome,
        };

        let lease = self.begin(spin_id);
        tracing::info!(spin_id = %spin_id, target = %target, "Spin started");

        let loaded = self.load(user, target).await;
        if !self.owns(&lease) {
            tracing::debug!(spin_id = %spin_id, "Ignoring load for cancelled spin");
            return Ok(report(SpinOutcome::Superseded));
        }

        let lists = match loaded {
            Ok(lists) => lists,
            Err(e) => {
                tracing::error!(spin_id = %spin_id, error = %e, "Wheel load failed");
                self.finish(&lease, CancelReason::LoadFailed, LOAD_FAILURE_MESSAGE);
                return Err(if e.is_load_failure() {
                    e
                } else {
                    AppError::LoadFailure(e.to_string())
                });
            }
        };

        let pool = build_pool(&lists, &self.filters);
        if pool.is_empty() {
            let message = if target.is_all() {
                EMPTY_ALL_MESSAGE
            } else {
                EMPTY_LIST_MESSAGE
            };
            tracing::info!(spin_id = %spin_id, target = %target, "No eligible items");
            self.finish(&lease, CancelReason::EmptyPool, message);
            return Ok(report(SpinOutcome::Empty {
                message: message.to_string(),
            }));
        }

        let chosen_index = self.pick_index(pool.len());
        let chosen = pool[chosen_index].clone();
        let pick = match lists.get(&chosen.list_type) {
            Some(raw) => resolve_redirect(&chosen, raw),
            None => chosen.clone(),
        };
        let timeline = Timeline::build(&pool, chosen_index, pick.clone(), &self.config);

        let outcome = SpinOutcome::Animating {
            pool_size: pool.len(),
            redirected: pick.id != chosen.id,
            chosen,
            pick: pick.clone(),
            tick_count: timeline.ticks.len(),
            duration_ms: timeline.duration().as_millis() as u64,
            audio_cue_ms: timeline.audio_cue.map(|at| at.as_millis() as u64),
        };

        if !self.animate(lease, timeline, &pick) {
            return Ok(report(SpinOutcome::Superseded));
        }

        tracing::info!(
            spin_id = %spin_id,
            pool_size = pool.len(),
            pick = %pick.id,
            "Wheel animating"
        );
        Ok(report(outcome))
    }

    /// Tears the wheel down: cancels any spin in flight and clears the panel
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        match state.session.take() {
            Some(session) => {
                tracing::info!(spin_id = %session.id, "Wheel closed mid-spin");
                session.cancel();
                state.phase = SpinState::Cancelled(CancelReason::TornDown);
            }
            None => state.phase = SpinState::Idle,
        }
        self.surface.reset();
    }

    /// Opens a new session, cancelling whatever was running
    fn begin(&self, spin_id: Uuid) -> DisplayLease {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(previous) = state.session.take() {
            tracing::info!(
                spin_id = %previous.id,
                reason = ?CancelReason::Superseded,
                "Cancelling previous spin"
            );
            previous.cancel();
        }
        state.phase = SpinState::Loading;
        state.session = Some(SpinSession {
            id: spin_id,
            ticks: None,
            audio: None,
        });

        let lease = self.surface.claim(state.generation);
        lease.start_spinner();
        lease
    }

    fn owns(&self, lease: &DisplayLease) -> bool {
        self.state.lock().generation == lease.generation()
    }

    /// Ends a session that never reached the countdown
    fn finish(&self, lease: &DisplayLease, reason: CancelReason, message: &str) {
        let mut state = self.state.lock();
        if state.generation != lease.generation() {
            return;
        }
        state.phase = SpinState::Cancelled(reason);
        state.session = None;
        lease.show_message(message);
    }

    fn pick_index(&self, pool_size: usize) -> usize {
        let unit: f64 = self.rng.lock().random();
        ((unit * pool_size as f64).floor() as usize).min(pool_size - 1)
    }

    /// Loads every list the target needs. One failed list fails the whole spin.
    async fn load(&self, user: &UserSession, target: SpinTarget) -> AppResult<LoadedLists> {
        let mut tasks = Vec::new();
        for list_type in target.list_types() {
            let source = Arc::clone(&self.source);
            let user = user.clone();
            let task = tokio::spawn(async move { source.load(&user, list_type).await });
            tasks.push((list_type, task));
        }

        let mut lists = LoadedLists::new();
        for (list_type, task) in tasks {
            let snapshot = task
                .await
                .map_err(|e| AppError::Internal(e.to_string()))??;
            tracing::debug!(list = %list_type, records = snapshot.len(), "List loaded for spin");
            lists.insert(list_type, snapshot);
        }
        Ok(lists)
    }

    /// Schedules the countdown and the audio cue for the current session
    fn animate(&self, lease: DisplayLease, timeline: Timeline, pick: &Candidate) -> bool {
        let mut state = self.state.lock();
        let generation = lease.generation();
        if state.generation != generation {
            return false;
        }

        let start = Instant::now();
        let audio = timeline.audio_cue.map(|at| {
            let cue = Arc::clone(&self.audio);
            let controller = Arc::clone(&self.state);
            tokio::spawn(async move {
                tokio::time::sleep_until(start + at).await;
                if controller.lock().generation == generation {
                    audio::play_best_effort(cue.as_ref());
                }
            })
        });

        let card = ResultCard::for_candidate(pick);
        let ticks = tokio::spawn(run_ticks(
            lease,
            timeline.ticks,
            card,
            start,
            Arc::clone(&self.state),
        ));

        state.phase = SpinState::Animating;
        if let Some(session) = state.session.as_mut() {
            session.ticks = Some(ticks);
            session.audio = audio;
        }
        true
    }
}

/// Fires ticks in order, stopping as soon as the lease is revoked
async fn run_ticks(
    lease: DisplayLease,
    ticks: Vec<Tick>,
    card: ResultCard,
    start: Instant,
    state: Arc<Mutex<ControllerState>>,
) {
    let last = ticks.len().saturating_sub(1);
    for (index, tick) in ticks.into_iter().enumerate() {
        tokio::time::sleep_until(start + tick.delay).await;
        if !lease.show_pick(tick.candidate.title()) {
            return;
        }
        if index == last {
            let title = card.title.clone();
            lease.settle(card);
            let mut state = state.lock();
            if state.generation == lease.generation() {
                state.phase = SpinState::Settled;
                state.session = None;
            }
            tracing::info!(pick = %title, list = %tick.candidate.list_type, "Wheel settled");
            return;
        }
    }
}

impl std::fmt::Debug for WheelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelController")
            .field("config", &self.config)
            .field("source", &self.source.name())
            .field("state", &self.state())
            .finish()
    }
}
