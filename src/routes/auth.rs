use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, TokenResponse},
    error::AppResult,
    response::ApiResponse,
    services::auth_service,
    session::{Session, SessionView},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/", get(current_session))
        .route("/editing", axum::routing::delete(end_editing))
        .route("/editing/{id}", post(begin_editing))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin token", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Invalid password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Guest session; discard the token", body = ApiResponse<SessionView>)
    ),
    tag = "Auth"
)]
pub async fn logout(session: Session) -> Json<ApiResponse<SessionView>> {
    Json(auth_service::logout(session))
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionView>)
    ),
    tag = "Auth"
)]
pub async fn current_session(session: Session) -> Json<ApiResponse<SessionView>> {
    Json(auth_service::current_session(session))
}

#[utoipa::path(
    post,
    path = "/api/session/editing/{id}",
    params(
        ("id" = Uuid, Path, description = "Item being edited")
    ),
    responses(
        (status = 200, description = "Token carrying the editing item", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Admin session required"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn begin_editing(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::begin_editing(&state, session, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/session/editing",
    responses(
        (status = 200, description = "Token without editing item", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Admin session required")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn end_editing(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::end_editing(&state, session)?;
    Ok(Json(resp))
}
