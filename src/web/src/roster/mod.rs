pub mod routes;

use crate::{ApiError, ApiResult, CoachAppData, CurrentUser};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router};
use log::info;
use scoring::Roster;
use std::collections::HashSet;

pub fn roster_routes() -> Router<CoachAppData> {
    routes::routes()
}

pub async fn roster_get_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.rosters().get(&user.user_id).await?))
}

pub async fn roster_put_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Json(roster): Json<Roster>,
) -> ApiResult<impl IntoResponse> {
    validate_roster(&roster)?;

    state.rosters().put(&user.user_id, &roster).await?;

    info!(
        "roster for {} replaced ({} players)",
        user.user_id,
        roster.players.len()
    );

    Ok(Json(roster))
}

/// Matches merge saved rows by dorsal, so dorsals must be present and unique.
fn validate_roster(roster: &Roster) -> ApiResult<()> {
    let mut seen = HashSet::new();

    for player in &roster.players {
        let dorsal = player.dorsal.trim();

        if dorsal.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Player '{}' has no dorsal",
                player.name
            )));
        }

        if !seen.insert(dorsal) {
            return Err(ApiError::BadRequest(format!("Duplicate dorsal '{}'", dorsal)));
        }
    }

    Ok(())
}
