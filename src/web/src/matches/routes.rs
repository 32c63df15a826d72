use crate::CoachAppData;
use axum::routing::get;
use axum::Router;

pub fn routes() -> Router<CoachAppData> {
    Router::new()
        .route(
            "/api/matches",
            get(super::match_list_action).post(super::match_create_action),
        )
        .route(
            "/api/matches/{id}",
            get(super::match_get_action).delete(super::match_delete_action),
        )
        .route("/api/matches/{id}/summary", get(super::match_summary_action))
}
