use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::{Category, Store};

/// Items whose age in whole days is at most this are flagged as new.
pub const NEW_ITEM_WINDOW_DAYS: i64 = 1;

/// Age is truncated to whole days, so an item stays new until it is 48h old.
pub fn is_recent(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(created_at).num_days() <= NEW_ITEM_WINDOW_DAYS
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: Category,
    pub category_label: String,
    pub store: Store,
    pub store_label: String,
    pub sold: bool,
    pub slot1: Option<f64>,
    pub slot2: Option<f64>,
    pub slot3: Option<f64>,
    /// Human-readable rendering of the populated measurement slots.
    pub measurements_display: String,
    pub is_new: bool,
    pub primary_image_id: Option<Uuid>,
    pub image_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemImage {
    pub id: Uuid,
    pub item_id: Uuid,
    pub content_type: String,
    pub width: i32,
    pub height: i32,
    pub size_bytes: i64,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryInfo {
    pub key: Category,
    pub label: String,
    pub plural: String,
    pub required_slots: Vec<String>,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryStats {
    pub available_el_rastro: i64,
    pub available_regueros: i64,
    pub sold: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_window_counts_whole_days() {
        let now = Utc::now();
        assert!(is_recent(now - Duration::hours(23), now));
        assert!(is_recent(now - Duration::hours(24), now));
        assert!(is_recent(now - Duration::hours(47), now));
        assert!(!is_recent(now - Duration::hours(48), now));
        assert!(!is_recent(now - Duration::days(3), now));
    }
}
