use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::Store,
    models::{CategoryInfo, Item},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    /// Category key or label; unknown labels are filed under `other`.
    pub category: String,
    pub store: Store,
    #[serde(default)]
    pub sold: bool,
    pub slot1: Option<f64>,
    pub slot2: Option<f64>,
    pub slot3: Option<f64>,
    /// Base64 photos; the first one becomes the primary image.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Absent fields keep their stored value. A slot sent as `0` is cleared.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub store: Option<Store>,
    pub sold: Option<bool>,
    pub slot1: Option<f64>,
    pub slot2: Option<f64>,
    pub slot3: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetSoldRequest {
    pub sold: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemList {
    #[schema(value_type = Vec<Item>)]
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<CategoryInfo>)]
    pub items: Vec<CategoryInfo>,
}

