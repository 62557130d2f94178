use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::{Config, WheelConfig};
use crate::models::UserSession;
use crate::error::AppResult;
use crate::services::{
    ActorFilters, InMemorySource, RealtimeDbSource, SnapshotCache, SnapshotSource,
};
use crate::wheel::{AudioCue, LoggedCue, WheelController};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Long-lived services behind the router
pub struct AppStateInner {
    /// The signed-in user, if any
    pub user: RwLock<Option<UserSession>>,
    pub snapshots: Arc<SnapshotCache>,
    pub filters: Arc<ActorFilters>,
    pub wheel: WheelController,
}

impl AppState {
    /// Builds state that reads lists from the configured realtime database
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let upstream: Arc<dyn SnapshotSource> =
            Arc::new(RealtimeDbSource::new(&config.database_url)?);
        Ok(Self::with_source(upstream, config.wheel(), Arc::new(LoggedCue)))
    }

    /// Builds state over lists held in process
    pub fn in_memory(source: Arc<InMemorySource>, wheel: WheelConfig) -> Self {
        Self::with_source(source, wheel, Arc::new(LoggedCue))
    }

    pub fn with_source(
        upstream: Arc<dyn SnapshotSource>,
        wheel: WheelConfig,
        audio: Arc<dyn AudioCue>,
    ) -> Self {
        let snapshots = Arc::new(SnapshotCache::new(upstream));
        let filters = Arc::new(ActorFilters::default());
        let controller = WheelController::new(wheel, snapshots.clone(), filters.clone(), audio);

        Self {
            inner: Arc::new(AppStateInner {
                user: RwLock::new(None),
                snapshots,
                filters,
                wheel: controller,
            }),
        }
    }

    pub async fn current_user(&self) -> Option<UserSession> {
        self.inner.user.read().await.clone()
    }
}
