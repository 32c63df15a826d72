use crate::{ApiError, ApiResult, CoachAppData};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use scoring::UserSession;

pub const USER_HEADER: &str = "x-user-id";

/// The acting user, loaded fresh from the users collection on every request.
pub struct CurrentUser(pub UserSession);

impl FromRequestParts<CoachAppData> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CoachAppData,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", USER_HEADER)))?;

        let session = state.users().load_session(user_id).await?;

        Ok(CurrentUser(session))
    }
}

/// Owners and admins may see a match. Anyone else gets the same answer as for
/// a match that does not exist.
pub fn ensure_owner(owner_id: &str, user: &UserSession) -> ApiResult<()> {
    if owner_id == user.user_id || user.is_admin {
        Ok(())
    } else {
        Err(ApiError::NotFound("Match not found".to_string()))
    }
}
