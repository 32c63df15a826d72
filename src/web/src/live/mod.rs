pub mod registry;
pub mod routes;
mod scoreboard;
mod session;
mod view;

pub use registry::{MatchSessionHandle, SessionRegistry};
pub use view::LiveMatchView;

use crate::{ensure_owner, ApiError, ApiResult, CoachAppData, CurrentUser};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use scoring::{LiveMatch, MatchAction, UserSession};
use serde::Deserialize;

pub fn live_routes() -> Router<CoachAppData> {
    routes::routes()
}

#[derive(Deserialize)]
pub struct LiveRequest {
    pub id: String,
}

#[derive(Deserialize)]
pub struct LiveSaveRequest {
    #[serde(default)]
    pub exit: bool,
}

async fn owned_session(
    state: &CoachAppData,
    match_id: &str,
    user: &UserSession,
) -> ApiResult<MatchSessionHandle> {
    let handle = state
        .sessions
        .get(match_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No live session for match '{}'", match_id)))?;

    ensure_owner(handle.owner_id(), user)?;

    Ok(handle)
}

pub async fn live_open_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<LiveRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(handle) = state.sessions.get(&route_params.id).await {
        ensure_owner(handle.owner_id(), &user)?;
        return Ok(Json(handle.view().await?));
    }

    let document = state.matches().get_required(&route_params.id).await?;
    ensure_owner(&document.owner_id, &user)?;

    let roster = state.rosters().get(&document.owner_id).await?;
    let last_saved = document.to_fields()?;
    let owner_id = document.owner_id.clone();

    let live = LiveMatch::from_document(route_params.id, document, &roster);

    let handle = state
        .sessions
        .open(live, &owner_id, state.matches(), Some(last_saved))
        .await;

    Ok(Json(handle.view().await?))
}

pub async fn live_get_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<LiveRequest>,
) -> ApiResult<impl IntoResponse> {
    let handle = owned_session(&state, &route_params.id, &user).await?;

    Ok(Json(handle.view().await?))
}

pub async fn live_apply_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<LiveRequest>,
    Json(action): Json<MatchAction>,
) -> ApiResult<impl IntoResponse> {
    let handle = owned_session(&state, &route_params.id, &user).await?;

    Ok(Json(handle.apply(action).await?))
}

pub async fn live_save_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<LiveRequest>,
    Json(request): Json<LiveSaveRequest>,
) -> ApiResult<impl IntoResponse> {
    let handle = owned_session(&state, &route_params.id, &user).await?;

    let view = handle.save(user, request.exit).await?;

    if request.exit {
        state.sessions.close(&route_params.id).await;
    }

    Ok(Json(view))
}

pub async fn live_close_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<LiveRequest>,
) -> ApiResult<impl IntoResponse> {
    owned_session(&state, &route_params.id, &user).await?;

    state.sessions.close(&route_params.id).await;

    Ok(StatusCode::NO_CONTENT)
}
