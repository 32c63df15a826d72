use crate::CoachAppData;
use axum::routing::{get, post};
use axum::Router;

pub fn routes() -> Router<CoachAppData> {
    Router::new()
        .route("/api/exercises", get(super::exercise_list_action))
        .route(
            "/api/exercises/{id}/favorite",
            post(super::exercise_favorite_action),
        )
}
