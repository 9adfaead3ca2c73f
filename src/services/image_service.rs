use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::images::{AddImagesRequest, ImageList, SetPrimaryImageRequest},
    entity::{
        item_images::{ActiveModel as ImageActive, Column as ImageCol, Entity as ItemImages},
        items::{Column as ItemCol, Entity as Items, Model as ItemModel},
    },
    error::{AppError, AppResult},
    imaging::{self, ProcessedImage},
    middleware::auth::ensure_admin,
    models::ItemImage,
    response::{ApiResponse, Meta},
    services::item_service::find_visible_item,
    session::Session,
    state::AppState,
    validation::validate_image_batch,
};

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    item_id: Uuid,
    content_type: String,
    width: i32,
    height: i32,
    size_bytes: i64,
    created_at: DateTime<Utc>,
}

/// Stored image bytes plus their MIME type.
pub struct ImagePayload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub async fn insert_images<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    images: Vec<ProcessedImage>,
) -> AppResult<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(images.len());
    for image in images {
        let id = Uuid::new_v4();
        ImageActive {
            id: Set(id),
            item_id: Set(item_id),
            content_type: Set(image.content_type.to_string()),
            width: Set(image.width as i32),
            height: Set(image.height as i32),
            payload: Set(image.bytes),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
        ids.push(id);
    }
    Ok(ids)
}

pub async fn list_images(
    state: &AppState,
    session: Session,
    item_id: Uuid,
) -> AppResult<ApiResponse<ImageList>> {
    let item = find_visible_item(state, session, item_id).await?;
    let items = image_infos(&state.pool, &item).await?;
    Ok(ApiResponse::success("Images", ImageList { items }, None))
}

pub async fn get_image_payload(
    state: &AppState,
    session: Session,
    item_id: Uuid,
    image_id: Uuid,
) -> AppResult<ImagePayload> {
    find_visible_item(state, session, item_id).await?;
    let image = ItemImages::find_by_id(image_id)
        .filter(ImageCol::ItemId.eq(item_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ImagePayload {
        content_type: image.content_type,
        bytes: image.payload,
    })
}

pub async fn add_images(
    state: &AppState,
    session: Session,
    item_id: Uuid,
    payload: AddImagesRequest,
) -> AppResult<ApiResponse<ImageList>> {
    ensure_admin(&session)?;
    if payload.images.is_empty() {
        return Err(AppError::BadRequest("no images provided".into()));
    }
    validate_image_batch(&payload.images)?;

    let processed = imaging::process_uploads(payload.images, state.config.image_max_side).await?;

    let txn = state.orm.begin().await?;
    let item = lock_item(&txn, item_id).await?;
    let ids = insert_images(&txn, item_id, processed).await?;

    let item = match ids.first() {
        Some(first) if payload.make_primary || item.primary_image_id.is_none() => {
            set_primary_reference(&txn, item_id, Some(*first)).await?;
            ItemModel {
                primary_image_id: Some(*first),
                ..item
            }
        }
        _ => item,
    };
    txn.commit().await?;

    tracing::info!(item_id = %item_id, added = ids.len(), "images added");

    if let Err(err) = log_audit(
        &state.pool,
        "admin",
        "image_add",
        Some(item_id),
        Some(serde_json::json!({ "image_ids": ids })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let items = image_infos(&state.pool, &item).await?;
    Ok(ApiResponse::success(
        "Images added",
        ImageList { items },
        Some(Meta::empty()),
    ))
}

pub async fn set_primary_image(
    state: &AppState,
    session: Session,
    item_id: Uuid,
    payload: SetPrimaryImageRequest,
) -> AppResult<ApiResponse<ImageList>> {
    ensure_admin(&session)?;

    let txn = state.orm.begin().await?;
    let item = lock_item(&txn, item_id).await?;

    let owned = ItemImages::find()
        .select_only()
        .column(ImageCol::Id)
        .filter(ImageCol::Id.eq(payload.image_id))
        .filter(ImageCol::ItemId.eq(item_id))
        .into_tuple::<Uuid>()
        .one(&txn)
        .await?;
    if owned.is_none() {
        return Err(AppError::NotFound);
    }

    set_primary_reference(&txn, item_id, Some(payload.image_id)).await?;
    txn.commit().await?;

    tracing::info!(item_id = %item_id, image_id = %payload.image_id, "primary image changed");

    if let Err(err) = log_audit(
        &state.pool,
        "admin",
        "image_primary",
        Some(item_id),
        Some(serde_json::json!({ "image_id": payload.image_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let item = ItemModel {
        primary_image_id: Some(payload.image_id),
        ..item
    };
    let items = image_infos(&state.pool, &item).await?;
    Ok(ApiResponse::success(
        "Primary image set",
        ImageList { items },
        Some(Meta::empty()),
    ))
}

pub async fn delete_image(
    state: &AppState,
    session: Session,
    item_id: Uuid,
    image_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(&session)?;

    let txn = state.orm.begin().await?;
    let item = lock_item(&txn, item_id).await?;

    let exists = ItemImages::find()
        .select_only()
        .column(ImageCol::Id)
        .filter(ImageCol::Id.eq(image_id))
        .filter(ImageCol::ItemId.eq(item_id))
        .into_tuple::<Uuid>()
        .one(&txn)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }

    // Hand the primary role to the oldest survivor before the row goes.
    let mut promoted = item.primary_image_id;
    if item.primary_image_id == Some(image_id) {
        promoted = ItemImages::find()
            .select_only()
            .column(ImageCol::Id)
            .filter(ImageCol::ItemId.eq(item_id))
            .filter(ImageCol::Id.ne(image_id))
            .order_by_asc(ImageCol::CreatedAt)
            .order_by_asc(ImageCol::Id)
            .into_tuple::<Uuid>()
            .one(&txn)
            .await?;
        set_primary_reference(&txn, item_id, promoted).await?;
    }

    ItemImages::delete_by_id(image_id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(item_id = %item_id, image_id = %image_id, "image deleted");

    if let Err(err) = log_audit(
        &state.pool,
        "admin",
        "image_delete",
        Some(item_id),
        Some(serde_json::json!({ "image_id": image_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "primary_image_id": promoted }),
        Some(Meta::empty()),
    ))
}

async fn lock_item(txn: &DatabaseTransaction, item_id: Uuid) -> AppResult<ItemModel> {
    Items::find_by_id(item_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn set_primary_reference<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    image_id: Option<Uuid>,
) -> AppResult<()> {
    Items::update_many()
        .col_expr(ItemCol::PrimaryImageId, Expr::value(image_id))
        .filter(ItemCol::Id.eq(item_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Metadata only; payloads are served one at a time. Primary first, then oldest.
async fn image_infos(pool: &DbPool, item: &ItemModel) -> AppResult<Vec<ItemImage>> {
    let rows: Vec<ImageRow> = sqlx::query_as(
        r#"
        SELECT id, item_id, content_type, width, height,
               octet_length(payload)::BIGINT AS size_bytes, created_at
        FROM item_images
        WHERE item_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(item.id)
    .fetch_all(pool)
    .await?;

    let mut images: Vec<ItemImage> = rows
        .into_iter()
        .map(|row| ItemImage {
            is_primary: item.primary_image_id == Some(row.id),
            id: row.id,
            item_id: row.item_id,
            content_type: row.content_type,
            width: row.width,
            height: row.height,
            size_bytes: row.size_bytes,
            created_at: row.created_at,
        })
        .collect();
    images.sort_by_key(|image| !image.is_primary);
    Ok(images)
}
