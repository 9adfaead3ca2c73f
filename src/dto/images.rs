use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ItemImage;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddImagesRequest {
    /// Base64 payloads or `data:` URLs (png, jpeg, webp).
    pub images: Vec<String>,
    /// Make the first uploaded image primary even if one is already set.
    #[serde(default)]
    pub make_primary: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPrimaryImageRequest {
    pub image_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ImageList {
    #[schema(value_type = Vec<ItemImage>)]
    pub items: Vec<ItemImage>,
}
