//! Sources of list snapshots
//!
//! The wheel never talks to the store directly: it asks a `SnapshotSource` for the
//! current contents of a list. `RealtimeDbSource` reads the realtime database over
//! REST, `SnapshotCache` keeps the last good read of each list in memory.
use reqwest::{Client as HttpClient, Url};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{ListSnapshot, ListType, Record, UserSession},
};

/// Read access to a user's lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Current contents of one list
    async fn load(&self, user: &UserSession, list_type: ListType) -> AppResult<Arc<ListSnapshot>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Reads lists from the realtime database REST API
#[derive(Clone)]
pub struct RealtimeDbSource {
    http_client: HttpClient,
    database_url: Url,
}

impl RealtimeDbSource {
    pub fn new(database_url: &str) -> AppResult<Self> {
        let parsed = Url::parse(database_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Bad database URL: {}", database_url))
            })?;
        Ok(Self {
            http_client: HttpClient::new(),
            database_url: parsed,
        })
    }

    /// REST location of a user's list. The uid is encoded as a single path segment.
    pub fn list_url(&self, user: &UserSession, list_type: ListType) -> AppResult<Url> {
        UserSession::validate_uid(&user.uid).map_err(AppError::InvalidInput)?;

        let file = format!("{}.json", list_type.as_str());
        let mut url = self.database_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("database URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["users", user.uid.as_str(), file.as_str()]);
        Ok(url)
    }

    /// Turns the raw JSON object into a snapshot, skipping entries that are not records
    fn parse_snapshot(list_type: ListType, body: Option<BTreeMap<String, Value>>) -> ListSnapshot {
        let mut snapshot = ListSnapshot::new();
        for (id, value) in body.unwrap_or_default() {
            match serde_json::from_value::<Record>(value) {
                Ok(record) => {
                    snapshot.insert(id, record);
                }
                Err(e) => {
                    tracing::warn!(
                        list = %list_type,
                        id = %id,
                        error = %e,
                        "Skipping malformed record"
                    );
                }
            }
        }
        snapshot
    }
}

#[async_trait::async_trait]
impl SnapshotSource for RealtimeDbSource {
    async fn load(&self, user: &UserSession, list_type: ListType) -> AppResult<Arc<ListSnapshot>> {
        let url = self.list_url(user, list_type)?;
        let mut request = self.http_client.get(url);
        if let Some(token) = &user.id_token {
            request = request.query(&[("auth", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(list = %list_type, status = %status, "Realtime database read rejected");
            return Err(AppError::LoadFailure(format!(
                "{} read returned {}",
                list_type, status
            )));
        }

        let body: Option<BTreeMap<String, Value>> = response.json().await?;
        let snapshot = Self::parse_snapshot(list_type, body);
        tracing::debug!(list = %list_type, records = snapshot.len(), "List fetched");
        Ok(Arc::new(snapshot))
    }

    fn name(&self) -> &'static str {
        "realtime-db"
    }
}

/// Lists held in process, keyed by user id. Used for offline runs and tests.
#[derive(Debug, Default)]
pub struct InMemorySource {
    lists: RwLock<HashMap<(String, ListType), Arc<ListSnapshot>>>,
}

impl InMemorySource {
    pub async fn put(&self, uid: &str, list_type: ListType, snapshot: ListSnapshot) {
        self.lists
            .write()
            .await
            .insert((uid.to_string(), list_type), Arc::new(snapshot));
    }
}

#[async_trait::async_trait]
impl SnapshotSource for InMemorySource {
    async fn load(&self, user: &UserSession, list_type: ListType) -> AppResult<Arc<ListSnapshot>> {
        let lists = self.lists.read().await;
        Ok(lists
            .get(&(user.uid.clone(), list_type))
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Keeps the last successful read of each list in front of another source
pub struct SnapshotCache {
    upstream: Arc<dyn SnapshotSource>,
    entries: RwLock<HashMap<(String, ListType), Arc<ListSnapshot>>>,
}

impl SnapshotCache {
    pub fn new(upstream: Arc<dyn SnapshotSource>) -> Self {
        Self {
            upstream,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drops one cached list for every user
    pub async fn invalidate(&self, list_type: ListType) {
        self.entries
            .write()
            .await
            .retain(|(_, cached), _| *cached != list_type);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn is_cached(&self, uid: &str, list_type: ListType) -> bool {
        self.entries
            .read()
            .await
            .contains_key(&(uid.to_string(), list_type))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for SnapshotCache {
    async fn load(&self, user: &UserSession, list_type: ListType) -> AppResult<Arc<ListSnapshot>> {
        let key = (user.uid.clone(), list_type);
        if let Some(hit) = self.entries.read().await.get(&key) {
            tracing::debug!(list = %list_type, "Snapshot cache hit");
            return Ok(Arc::clone(hit));
        }

        tracing::debug!(list = %list_type, source = self.upstream.name(), "Snapshot cache miss");
        let snapshot = self.upstream.load(user, list_type).await?;
        self.entries
            .write()
            .await
            .insert(key, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "cache"
    }
}
