use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::items::CategoryList,
    error::AppResult,
    models::InventoryStats,
    response::ApiResponse,
    services::{catalog_service, item_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/stats", get(inventory_stats))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories with their measurement slots", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories() -> Json<ApiResponse<CategoryList>> {
    Json(catalog_service::list_categories())
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Available items per store and sold count", body = ApiResponse<InventoryStats>)
    ),
    tag = "Catalog"
)]
pub async fn inventory_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<InventoryStats>>> {
    let resp = item_service::inventory_stats(&state).await?;
    Ok(Json(resp))
}
