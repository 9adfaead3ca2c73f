use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::{Category, Store},
    dto::{
        auth::{LoginRequest, TokenResponse},
        images::{AddImagesRequest, ImageList, SetPrimaryImageRequest},
        items::{CategoryList, CreateItemRequest, ItemList, SetSoldRequest, UpdateItemRequest},
    },
    models::{CategoryInfo, InventoryStats, Item, ItemImage},
    response::{ApiResponse, Meta},
    routes::{auth, catalog, health, images, items, params},
    session::SessionView,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::current_session,
        auth::begin_editing,
        auth::end_editing,
        catalog::list_categories,
        catalog::inventory_stats,
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::set_sold,
        items::delete_item,
        items::export_items,
        images::list_images,
        images::get_image,
        images::add_images,
        images::set_primary_image,
        images::delete_image
    ),
    components(
        schemas(
            Category,
            Store,
            Item,
            ItemImage,
            CategoryInfo,
            InventoryStats,
            SessionView,
            LoginRequest,
            TokenResponse,
            CreateItemRequest,
            UpdateItemRequest,
            SetSoldRequest,
            AddImagesRequest,
            SetPrimaryImageRequest,
            ItemList,
            ImageList,
            CategoryList,
            params::Pagination,
            params::ItemSort,
            Meta,
            ApiResponse<Item>,
            ApiResponse<ItemList>,
            ApiResponse<ImageList>,
            ApiResponse<CategoryList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Admin login and session endpoints"),
        (name = "Catalog", description = "Categories and inventory statistics"),
        (name = "Items", description = "Furniture item endpoints"),
        (name = "Images", description = "Item photo endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
