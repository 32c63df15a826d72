pub mod routes;

use crate::{ensure_owner, ApiError, ApiResult, CoachAppData, CurrentUser};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use log::info;
use scoring::{
    validate_half_duration, LiveMatch, MatchDocument, MatchMetadata, MatchSide, MatchSummary,
    DEFAULT_HALF_DURATION_MINUTES,
};
use serde::{Deserialize, Serialize};

pub fn match_routes() -> Router<CoachAppData> {
    routes::routes()
}

#[derive(Deserialize)]
pub struct MatchRequest {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCreateRequest {
    #[serde(flatten)]
    pub metadata: MatchMetadata,
    #[serde(default)]
    pub my_team_side: Option<MatchSide>,
    #[serde(default)]
    pub timer_duration: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCreated {
    pub id: String,
    #[serde(rename = "match")]
    pub document: MatchDocument,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListItem {
    pub id: String,
    #[serde(flatten)]
    pub metadata: MatchMetadata,
    pub my_team_side: Option<MatchSide>,
    pub my_team_goals: usize,
    pub opponent_goals: usize,
}

impl MatchListItem {
    fn new(id: String, document: MatchDocument) -> Self {
        MatchListItem {
            my_team_goals: document.my_team_players.iter().map(|p| p.goals.len()).sum(),
            opponent_goals: document.opponent_players.iter().map(|p| p.goals.len()).sum(),
            id,
            metadata: document.metadata,
            my_team_side: document.my_team_side,
        }
    }
}

pub async fn match_list_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let mut matches: Vec<MatchListItem> = state
        .matches()
        .list_by_owner(&user.user_id)
        .await?
        .into_iter()
        .map(|(id, document)| MatchListItem::new(id, document))
        .collect();

    matches.sort_by(|a, b| {
        (b.metadata.date, b.metadata.time).cmp(&(a.metadata.date, a.metadata.time))
    });

    Ok(Json(matches))
}

pub async fn match_create_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<MatchCreateRequest>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_entitled()?;

    let minutes =
        validate_half_duration(request.timer_duration.unwrap_or(DEFAULT_HALF_DURATION_MINUTES))?;

    let roster = state.rosters().get(&user.user_id).await?;

    let mut live = LiveMatch::new(String::new(), request.metadata, &roster, minutes);
    live.my_team_side = request.my_team_side;

    let document = live.to_document(&user.user_id);
    let id = state.matches().create(&document).await?;

    Ok((StatusCode::CREATED, Json(MatchCreated { id, document })))
}

pub async fn match_get_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<MatchRequest>,
) -> ApiResult<impl IntoResponse> {
    let document = state.matches().get_required(&route_params.id).await?;
    ensure_owner(&document.owner_id, &user)?;

    Ok(Json(document))
}

pub async fn match_delete_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<MatchRequest>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_entitled()?;

    let document = state.matches().get_required(&route_params.id).await?;
    ensure_owner(&document.owner_id, &user)?;

    state.sessions.close(&route_params.id).await;

    if !state.matches().delete(&route_params.id).await? {
        return Err(ApiError::NotFound(format!(
            "Match '{}' not found",
            route_params.id
        )));
    }

    info!("match {} deleted by {}", route_params.id, user.user_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Prefers the live session when one is open, so the summary includes
/// changes the autosave has not written yet.
pub async fn match_summary_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<MatchRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(handle) = state.sessions.get(&route_params.id).await {
        ensure_owner(handle.owner_id(), &user)?;
        return Ok(Json(handle.summary().await?));
    }

    let document = state.matches().get_required(&route_params.id).await?;
    ensure_owner(&document.owner_id, &user)?;

    let roster = state.rosters().get(&document.owner_id).await?;
    let live = LiveMatch::from_document(route_params.id, document, &roster);

    Ok(Json(MatchSummary::build(&live)))
}
