use axum::{extract::FromRequestParts, http::header};

use crate::{
    error::AppError,
    services::auth_service::decode_token,
    session::Session,
    state::AppState,
};

pub fn ensure_admin(session: &Session) -> Result<(), AppError> {
    if !session.is_admin() {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Requests without an `Authorization` header are guests; a header that is
/// present must carry a valid admin token.
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Session::Guest);
        };

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        decode_token(&state.config.jwt_secret, token)
    }
}
