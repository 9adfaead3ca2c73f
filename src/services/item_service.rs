use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    catalog::{Category, Store},
    db::DbPool,
    dto::items::{CreateItemRequest, ItemList, SetSoldRequest, UpdateItemRequest},
    entity::items::{ActiveModel, Column, Entity as Items, Model as ItemModel},
    error::{AppError, AppResult},
    imaging,
    measurements,
    middleware::auth::ensure_admin,
    models::{InventoryStats, Item, is_recent},
    response::{ApiResponse, Meta},
    routes::params::{ItemQuery, ItemSort},
    services::image_service::insert_images,
    session::Session,
    state::AppState,
    validation::{normalize_description, validate_image_batch, validate_name, validate_price},
};

pub async fn list_items(
    state: &AppState,
    session: Session,
    query: ItemQuery,
) -> AppResult<ApiResponse<ItemList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let sold = query.sold.unwrap_or(false);
    if sold && !session.is_admin() {
        return Err(AppError::Forbidden);
    }

    let mut condition = Condition::all().add(Column::Sold.eq(sold));

    if let Some(store) = query.store {
        condition = condition.add(Column::Store.eq(store.key()));
    }

    if let Some(category) = query.category() {
        condition = condition.add(Column::Category.eq(category.key()));
    }

    if let Some(search) = query.search() {
        let pattern = format!("%{}%", escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    let finder = Items::find().filter(condition);
    let finder = match query.sort.unwrap_or_default() {
        ItemSort::Newest => finder.order_by_desc(Column::CreatedAt),
        ItemSort::Oldest => finder.order_by_asc(Column::CreatedAt),
        ItemSort::PriceAsc => finder.order_by_asc(Column::Price),
        ItemSort::PriceDesc => finder.order_by_desc(Column::Price),
    }
    .order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let counts = image_counts(&state.pool, &ids).await?;

    let items = models
        .into_iter()
        .map(|m| {
            let count = counts.get(&m.id).copied().unwrap_or(0);
            item_from_entity(m, count)
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Items", ItemList { items }, Some(meta)))
}

pub async fn get_item(state: &AppState, session: Session, id: Uuid) -> AppResult<ApiResponse<Item>> {
    let model = find_visible_item(state, session, id).await?;
    let item = item_with_count(&state.pool, model).await?;
    Ok(ApiResponse::success("Item", item, None))
}

pub async fn create_item(
    state: &AppState,
    session: Session,
    payload: CreateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(&session)?;

    let name = validate_name(&payload.name)?;
    let price = validate_price(payload.price)?;
    let description = normalize_description(payload.description)?;
    let category = Category::from_label(&payload.category);
    let slots = measurements::validate(category, payload.slot1, payload.slot2, payload.slot3)?;
    validate_image_batch(&payload.images)?;

    let images = imaging::process_uploads(payload.images, state.config.image_max_side).await?;

    let id = Uuid::new_v4();
    let txn = state.orm.begin().await?;

    let item = ActiveModel {
        id: Set(id),
        name: Set(name),
        price: Set(price),
        description: Set(description),
        category: Set(category.key().to_string()),
        store: Set(payload.store.key().to_string()),
        sold: Set(payload.sold),
        slot1: Set(slots.slot1),
        slot2: Set(slots.slot2),
        slot3: Set(slots.slot3),
        primary_image_id: Set(None),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let image_ids = insert_images(&txn, id, images).await?;
    let item = match image_ids.first() {
        Some(primary) => {
            let mut active: ActiveModel = item.into();
            active.primary_image_id = Set(Some(*primary));
            active.update(&txn).await?
        }
        None => item,
    };

    txn.commit().await?;

    tracing::info!(item_id = %id, category = %category, images = image_ids.len(), "item created");

    if let Err(err) = log_audit(
        &state.pool,
        "admin",
        "item_create",
        Some(id),
        Some(serde_json::json!({ "category": category.key(), "images": image_ids.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item created",
        item_from_entity(item, image_ids.len() as i64)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    session: Session,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(&session)?;
    let existing = Items::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(item) => item,
        None => return Err(AppError::NotFound),
    };

    let touches_measurements = payload.category.is_some()
        || payload.slot1.is_some()
        || payload.slot2.is_some()
        || payload.slot3.is_some();

    let category = payload
        .category
        .as_deref()
        .map(Category::from_label)
        .unwrap_or_else(|| Category::from_label(&existing.category));
    let slot1 = payload.slot1.or(existing.slot1);
    let slot2 = payload.slot2.or(existing.slot2);
    let slot3 = payload.slot3.or(existing.slot3);

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(price) = payload.price {
        active.price = Set(validate_price(price)?);
    }
    if payload.description.is_some() {
        active.description = Set(normalize_description(payload.description)?);
    }
    if let Some(store) = payload.store {
        active.store = Set(store.key().to_string());
    }
    if let Some(sold) = payload.sold {
        active.sold = Set(sold);
    }
    if touches_measurements {
        let slots = measurements::validate(category, slot1, slot2, slot3)?;
        active.category = Set(category.key().to_string());
        active.slot1 = Set(slots.slot1);
        active.slot2 = Set(slots.slot2);
        active.slot3 = Set(slots.slot3);
    }

    let item = active.update(&state.orm).await?;

    tracing::info!(item_id = %id, "item updated");

    if let Err(err) = log_audit(&state.pool, "admin", "item_update", Some(id), None).await {
        tracing::warn!(error = %err, "audit log failed");
    }

    let item = item_with_count(&state.pool, item).await?;
    Ok(ApiResponse::success("Updated", item, Some(Meta::empty())))
}

pub async fn set_sold(
    state: &AppState,
    session: Session,
    id: Uuid,
    payload: SetSoldRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(&session)?;
    let existing = Items::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.sold = Set(payload.sold);
    let item = active.update(&state.orm).await?;

    tracing::info!(item_id = %id, sold = payload.sold, "item sold flag changed");

    let action = if payload.sold { "item_sold" } else { "item_available" };
    if let Err(err) = log_audit(&state.pool, "admin", action, Some(id), None).await {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if payload.sold { "Marked as sold" } else { "Marked as available" };
    let item = item_with_count(&state.pool, item).await?;
    Ok(ApiResponse::success(message, item, Some(Meta::empty())))
}

pub async fn delete_item(
    state: &AppState,
    session: Session,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(&session)?;
    // Images go with the item through ON DELETE CASCADE.
    let result = Items::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(item_id = %id, "item deleted");

    if let Err(err) = log_audit(&state.pool, "admin", "item_delete", Some(id), None).await {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: Uuid,
    name: &'a str,
    price: f64,
    category: &'static str,
    store: &'a str,
    sold: bool,
    slot1: Option<f64>,
    slot2: Option<f64>,
    slot3: Option<f64>,
    measurements: String,
    description: Option<&'a str>,
    created_at: String,
}

/// Full inventory as CSV, sold and available alike, oldest first.
pub async fn export_items(state: &AppState, session: Session) -> AppResult<Vec<u8>> {
    ensure_admin(&session)?;

    let models = Items::find()
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?;

    let body = write_csv(&models)?;
    tracing::info!(rows = models.len(), "inventory exported");
    Ok(body)
}

fn write_csv(models: &[ItemModel]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for model in models {
        let category = Category::from_label(&model.category);
        writer
            .serialize(ExportRow {
                id: model.id,
                name: &model.name,
                price: model.price,
                category: category.key(),
                store: &model.store,
                sold: model.sold,
                slot1: model.slot1,
                slot2: model.slot2,
                slot3: model.slot3,
                measurements: measurements::format(category, model.slot1, model.slot2, model.slot3),
                description: model.description.as_deref(),
                created_at: model
                    .created_at
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            })
            .map_err(anyhow::Error::from)?;
    }
    writer
        .into_inner()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err.to_string())))
}

pub async fn inventory_stats(state: &AppState) -> AppResult<ApiResponse<InventoryStats>> {
    let (available_el_rastro, available_regueros, sold): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE NOT sold AND store = $1),
            COUNT(*) FILTER (WHERE NOT sold AND store = $2),
            COUNT(*) FILTER (WHERE sold)
        FROM items
        "#,
    )
    .bind(Store::ElRastro.key())
    .bind(Store::Regueros.key())
    .fetch_one(&state.pool)
    .await?;

    let stats = InventoryStats {
        available_el_rastro,
        available_regueros,
        sold,
    };
    Ok(ApiResponse::success("Stats", stats, None))
}

/// Sold items are hidden from guests.
pub(crate) async fn find_visible_item(
    state: &AppState,
    session: Session,
    id: Uuid,
) -> AppResult<ItemModel> {
    let model = Items::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if model.sold && !session.is_admin() {
        return Err(AppError::NotFound);
    }
    Ok(model)
}

/// `ILIKE` treats `%`, `_` and `\` as metacharacters; match them literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

async fn image_counts(pool: &DbPool, ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, i64)> = sqlx::query_as(
        "SELECT item_id, COUNT(*) FROM item_images WHERE item_id = ANY($1) GROUP BY item_id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

async fn item_with_count(pool: &DbPool, model: ItemModel) -> AppResult<Item> {
    let counts = image_counts(pool, &[model.id]).await?;
    let count = counts.get(&model.id).copied().unwrap_or(0);
    item_from_entity(model, count)
}

pub fn item_from_entity(model: ItemModel, image_count: i64) -> AppResult<Item> {
    let category = Category::from_label(&model.category);
    let store: Store = model
        .store
        .parse()
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    let created_at = model.created_at.with_timezone(&Utc);

    Ok(Item {
        id: model.id,
        name: model.name,
        price: model.price,
        description: model.description,
        category,
        category_label: category.label().to_string(),
        store,
        store_label: store.label().to_string(),
        sold: model.sold,
        slot1: model.slot1,
        slot2: model.slot2,
        slot3: model.slot3,
        measurements_display: measurements::format(category, model.slot1, model.slot2, model.slot3),
        is_new: is_recent(created_at, Utc::now()),
        primary_image_id: model.primary_image_id,
        image_count,
        created_at,
    })
}
