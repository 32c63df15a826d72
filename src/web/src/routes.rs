use crate::exercises::exercise_routes;
use crate::live::live_routes;
use crate::matches::match_routes;
use crate::roster::roster_routes;
use crate::{ApiError, CoachAppData};
use axum::http::Uri;
use axum::Router;

async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

pub struct ServerRoutes;

impl ServerRoutes {
    pub fn create() -> Router<CoachAppData> {
        Router::<CoachAppData>::new()
            .merge(roster_routes())
            .merge(match_routes())
            .merge(live_routes())
            .merge(exercise_routes())
            .fallback(not_found_handler)
    }
}
