use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::images::{AddImagesRequest, ImageList, SetPrimaryImageRequest},
    error::AppResult,
    response::ApiResponse,
    services::image_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/images", get(list_images).post(add_images))
        .route(
            "/{id}/images/{image_id}",
            get(get_image).delete(delete_image),
        )
        .route("/{id}/primary-image", put(set_primary_image))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Image metadata, primary first", body = ApiResponse<ImageList>),
        (status = 404, description = "Item not found")
    ),
    tag = "Images"
)]
pub async fn list_images(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    let resp = image_service::list_images(&state, session, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/items/{id}/images/{image_id}",
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Encoded image bytes (image/jpeg)"),
        (status = 404, description = "Image not found")
    ),
    tag = "Images"
)]
pub async fn get_image(
    State(state): State<AppState>,
    session: Session,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Response> {
    let payload = image_service::get_image_payload(&state, session, id, image_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, payload.content_type),
            (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        payload.bytes,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/items/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = AddImagesRequest,
    responses(
        (status = 200, description = "Images after upload", body = ApiResponse<ImageList>),
        (status = 400, description = "Invalid image"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn add_images(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddImagesRequest>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    let resp = image_service::add_images(&state, session, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/items/{id}/primary-image",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = SetPrimaryImageRequest,
    responses(
        (status = 200, description = "Images with the new primary", body = ApiResponse<ImageList>),
        (status = 404, description = "Item or image not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn set_primary_image(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPrimaryImageRequest>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    let resp = image_service::set_primary_image(&state, session, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}/images/{image_id}",
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Deleted; reports the new primary image"),
        (status = 404, description = "Image not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    session: Session,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = image_service::delete_image(&state, session, id, image_id).await?;
    Ok(Json(resp))
}
