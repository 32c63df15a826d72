use crate::CoachAppData;
use axum::routing::{get, post};
use axum::Router;

pub fn routes() -> Router<CoachAppData> {
    Router::new()
        .route(
            "/api/matches/{id}/live",
            post(super::live_open_action)
                .get(super::live_get_action)
                .delete(super::live_close_action),
        )
        .route("/api/matches/{id}/live/actions", post(super::live_apply_action))
        .route("/api/matches/{id}/live/save", post(super::live_save_action))
        .route("/matches/{id}/scoreboard", get(super::scoreboard::scoreboard_action))
}
