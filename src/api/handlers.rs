use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{ListType, UserSession};
use crate::services::listing::{prepare_entries, ListEntry, SortMode};
use crate::services::SnapshotSource;
use crate::wheel::{SpinOutcome, SpinReport, SpinState, WheelView};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub uid: String,
    pub display_name: Option<String>,
    pub id_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub signed_in: bool,
    pub user: Option<UserSession>,
    pub greeting: Option<String>,
}

impl From<Option<UserSession>> for SessionResponse {
    fn from(user: Option<UserSession>) -> Self {
        Self {
            signed_in: user.is_some(),
            greeting: user.as_ref().map(|u| format!("Hi, {}", u.greeting_name())),
            user,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: SortMode,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub list_type: ListType,
    pub sort: SortMode,
    pub actor_filter: Option<String>,
    pub entries: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ActorFilterRequest {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ActorFilterResponse {
    pub list_type: ListType,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpinRequest {
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct WheelResponse {
    #[serde(flatten)]
    pub state: SpinState,
    #[serde(flatten)]
    pub view: WheelView,
}

fn parse_list_type(raw: &str) -> AppResult<ListType> {
    raw.parse().map_err(AppError::InvalidTarget)
}

async fn require_user(state: &AppState) -> AppResult<UserSession> {
    state.current_user().await.ok_or(AppError::NotAuthenticated)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Current sign-in state
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(state.current_user().await.into())
}

/// Signs a user in. Switching users drops everything read for the previous one.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> AppResult<Json<SessionResponse>> {
    let uid = request.uid.trim();
    UserSession::validate_uid(uid).map_err(AppError::InvalidInput)?;

    let user = UserSession {
        uid: uid.to_string(),
        display_name: request.display_name,
        id_token: request.id_token,
    };

    let previous = state.inner.user.write().await.replace(user.clone());
    if previous.is_some_and(|p| p.uid != user.uid) {
        reset_user_data(&state).await;
    }

    tracing::info!(uid = %user.uid, "User signed in");
    Ok(Json(Some(user).into()))
}

/// Signs out and tears the wheel down
pub async fn sign_out(State(state): State<AppState>) -> StatusCode {
    if let Some(user) = state.inner.user.write().await.take() {
        tracing::info!(uid = %user.uid, "User signed out");
    }
    reset_user_data(&state).await;
    StatusCode::NO_CONTENT
}

async fn reset_user_data(state: &AppState) {
    state.inner.wheel.close();
    state.inner.snapshots.clear().await;
    state.inner.filters.clear();
}

/// One list, actor-filtered and sorted for display
pub async fn get_list(
    State(state): State<AppState>,
    Path(list_type): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ListResponse>> {
    let list_type = parse_list_type(&list_type)?;
    let user = require_user(&state).await?;

    let snapshot = state.inner.snapshots.load(&user, list_type).await?;
    let entries = prepare_entries(list_type, &snapshot, &state.inner.filters, query.sort);

    Ok(Json(ListResponse {
        list_type,
        sort: query.sort,
        actor_filter: state.inner.filters.active_value(list_type),
        entries,
    }))
}

/// Forgets the cached copy of a list so the next read goes to the store
pub async fn refresh_list(
    State(state): State<AppState>,
    Path(list_type): Path<String>,
) -> AppResult<StatusCode> {
    let list_type = parse_list_type(&list_type)?;
    state.inner.snapshots.invalidate(list_type).await;
    tracing::debug!(list = %list_type, "List cache invalidated");
    Ok(StatusCode::NO_CONTENT)
}

/// Sets or clears a list's actor filter
pub async fn set_actor_filter(
    State(state): State<AppState>,
    Path(list_type): Path<String>,
    Json(request): Json<ActorFilterRequest>,
) -> AppResult<Json<ActorFilterResponse>> {
    let list_type = parse_list_type(&list_type)?;
    if !state.inner.filters.set(list_type, &request.value) {
        return Err(AppError::InvalidInput(format!(
            "{} does not support an actor filter",
            list_type
        )));
    }

    let value = state.inner.filters.active_value(list_type);
    tracing::info!(list = %list_type, filter = ?value, "Actor filter updated");
    Ok(Json(ActorFilterResponse { list_type, value }))
}

/// Starts a spin. Answers 202 while the countdown runs.
pub async fn spin(
    State(state): State<AppState>,
    Json(request): Json<SpinRequest>,
) -> AppResult<(StatusCode, Json<SpinReport>)> {
    let user = state.current_user().await;
    // Run detached so a dropped connection cannot abandon the spin mid-load
    let wheel = state.clone();
    let report = tokio::spawn(async move {
        wheel.inner.wheel.spin(user.as_ref(), &request.source).await
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let status = match report.outcome {
        SpinOutcome::Animating { .. } => StatusCode::ACCEPTED,
        SpinOutcome::Empty { .. } | SpinOutcome::Superseded => StatusCode::OK,
    };
    Ok((status, Json(report)))
}

/// What the wheel panel shows right now
pub async fn get_wheel(State(state): State<AppState>) -> Json<WheelResponse> {
    Json(WheelResponse {
        state: state.inner.wheel.state(),
        view: state.inner.wheel.view(),
    })
}

/// Closes the wheel panel, cancelling any spin in flight
pub async fn close_wheel(State(state): State<AppState>) -> StatusCode {
    state.inner.wheel.close();
    StatusCode::NO_CONTENT
}
