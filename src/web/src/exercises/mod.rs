pub mod routes;

use crate::{ApiError, ApiResult, CoachAppData, CurrentUser, UserFavorites};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Json, Router};
use database::Exercise;
use scoring::optimistic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn exercise_routes() -> Router<CoachAppData> {
    routes::routes()
}

#[derive(Deserialize)]
pub struct ExerciseRequest {
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseItem {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub is_favorite: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggled {
    pub exercise_id: String,
    pub is_favorite: bool,
}

/// Cached favorites for a user, loading them from the store on first use.
/// The shared map is only locked long enough to find the user's entry.
async fn favorites_for(state: &CoachAppData, user_id: &str) -> ApiResult<UserFavorites> {
    if let Some(cached) = state.favorites.lock().await.get(user_id) {
        return Ok(Arc::clone(cached));
    }

    let loaded = state.favorites_repository().get(user_id).await?;

    let mut cache = state.favorites.lock().await;
    let entry = cache
        .entry(user_id.to_string())
        .or_insert_with(|| Arc::new(Mutex::new(loaded)));

    Ok(Arc::clone(entry))
}

fn toggle(favorites: &mut BTreeSet<String>, exercise_id: &str) -> bool {
    if favorites.remove(exercise_id) {
        false
    } else {
        favorites.insert(exercise_id.to_string());
        true
    }
}

pub async fn exercise_list_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let user_favorites = favorites_for(&state, &user.user_id).await?;
    let favorites = user_favorites.lock().await.clone();

    let exercises: Vec<ExerciseItem> = state
        .exercises()
        .list()
        .await?
        .into_iter()
        .map(|exercise| ExerciseItem {
            is_favorite: favorites.contains(&exercise.id),
            exercise,
        })
        .collect();

    Ok(Json(exercises))
}

/// Flips the favorite locally first and undoes it if the store rejects the write.
pub async fn exercise_favorite_action(
    State(state): State<CoachAppData>,
    CurrentUser(user): CurrentUser,
    Path(route_params): Path<ExerciseRequest>,
) -> ApiResult<impl IntoResponse> {
    if !state.exercises().exists(&route_params.id).await? {
        return Err(ApiError::NotFound(format!(
            "Exercise '{}' not found",
            route_params.id
        )));
    }

    let user_favorites = favorites_for(&state, &user.user_id).await?;
    let mut favorites = user_favorites.lock().await;

    let repository = state.favorites_repository();
    let exercise_id = route_params.id;

    optimistic::commit(
        &mut *favorites,
        |set| toggle(set, &exercise_id),
        |set, _| {
            toggle(set, &exercise_id);
        },
        |set| {
            let snapshot = set.clone();
            let user_id = user.user_id.clone();

            async move { repository.put(&user_id, &snapshot).await }
        },
    )
    .await?;

    let is_favorite = favorites.contains(&exercise_id);

    Ok(Json(FavoriteToggled {
        exercise_id,
        is_favorite,
    }))
}
