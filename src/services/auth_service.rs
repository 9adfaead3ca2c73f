use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{Claims, LoginRequest, TokenResponse},
    entity::Items,
    error::{AppError, AppResult},
    middleware::auth::ensure_admin,
    response::{ApiResponse, Meta},
    session::{Session, SessionView},
    state::AppState,
};

const ADMIN_ROLE: &str = "admin";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password_hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Sign a token for an admin session. Guests never hold a token.
pub fn issue_token(secret: &str, session: Session, ttl_hours: i64) -> AppResult<String> {
    ensure_admin(&session)?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: ADMIN_ROLE.to_string(),
        role: ADMIN_ROLE.to_string(),
        editing: session.editing(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok(format!("Bearer {}", token))
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<Session> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::BadRequest("Invalid or expired token".into()))?;

    if decoded.claims.role != ADMIN_ROLE {
        return Err(AppError::Forbidden);
    }

    Ok(Session::Admin {
        editing: decoded.claims.editing,
    })
}

fn token_response(state: &AppState, session: Session) -> AppResult<TokenResponse> {
    let token = issue_token(&state.config.jwt_secret, session, state.config.token_ttl_hours)?;
    Ok(TokenResponse {
        token,
        session: session.view(),
    })
}

pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<TokenResponse>> {
    if !verify_password(&state.config.admin_password_hash, &payload.password)? {
        tracing::warn!("admin login rejected");
        return Err(AppError::BadRequest("Invalid password".into()));
    }

    let resp = token_response(state, Session::login())?;

    if let Err(err) = log_audit(&state.pool, ADMIN_ROLE, "admin_login", None, None).await {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub fn logout(session: Session) -> ApiResponse<SessionView> {
    ApiResponse::success("Logged out", session.logout().view(), Some(Meta::empty()))
}

pub fn current_session(session: Session) -> ApiResponse<SessionView> {
    ApiResponse::success("Session", session.view(), None)
}

pub async fn begin_editing(
    state: &AppState,
    session: Session,
    item_id: Uuid,
) -> AppResult<ApiResponse<TokenResponse>> {
    ensure_admin(&session)?;
    if Items::find_by_id(item_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let resp = token_response(state, session.begin_edit(item_id)?)?;
    Ok(ApiResponse::success("Editing", resp, Some(Meta::empty())))
}

pub fn end_editing(state: &AppState, session: Session) -> AppResult<ApiResponse<TokenResponse>> {
    let resp = token_response(state, session.end_edit()?)?;
    Ok(ApiResponse::success("Editing finished", resp, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn bare(token: &str) -> &str {
        token.trim_start_matches("Bearer ")
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("jueves").unwrap();
        assert!(verify_password(&hash, "jueves").unwrap());
        assert!(!verify_password(&hash, "viernes").unwrap());
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        assert!(matches!(
            verify_password("not-a-phc-string", "x"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn token_round_trip_keeps_editing_claim() {
        let item_id = Uuid::new_v4();
        let session = Session::login().begin_edit(item_id).unwrap();
        let token = issue_token(SECRET, session, 1).unwrap();
        assert!(token.starts_with("Bearer "));
        assert_eq!(decode_token(SECRET, bare(&token)).unwrap(), session);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, Session::login(), 1).unwrap();
        assert!(matches!(
            decode_token("other-secret", bare(&token)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn guests_get_no_token() {
        assert!(matches!(
            issue_token(SECRET, Session::Guest, 1),
            Err(AppError::Unauthorized)
        ));
    }
}
