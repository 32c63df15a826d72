use crate::CoachAppData;
use axum::routing::get;
use axum::Router;

pub fn routes() -> Router<CoachAppData> {
    Router::new().route(
        "/api/roster",
        get(super::roster_get_action).put(super::roster_put_action),
    )
}
