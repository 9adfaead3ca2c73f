use base64::{Engine, engine::general_purpose::STANDARD};
use furniture_inventory::{
    catalog::{Category, Store},
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        images::{AddImagesRequest, SetPrimaryImageRequest},
        items::{CreateItemRequest, SetSoldRequest, UpdateItemRequest},
    },
    error::AppError,
    routes::params::{ItemQuery, ItemSort},
    services::{image_service, item_service},
    session::Session,
    state::AppState,
};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

// Integration flow: admin adds items with photos -> guests browse -> edit,
// primary image changes, sold flag and cascade delete.
#[tokio::test]
async fn intake_browse_edit_and_delete_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let admin = Session::login();

    // Intake rejects a table without depth
    let err = item_service::create_item(&state, admin, table_request(Some(0.0), vec![]))
        .await
        .unwrap_err();
    match err {
        AppError::Validation { missing, .. } => assert_eq!(missing, vec!["depth".to_string()]),
        other => panic!("expected validation error, got {other:?}"),
    }

    // Valid table with two photos
    let created = item_service::create_item(
        &state,
        admin,
        table_request(Some(40.0), vec![photo(1600, 800), photo(200, 100)]),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(
        created.measurements_display,
        "120cm (length) × 75cm (height) × 40cm (depth)"
    );
    assert_eq!(created.image_count, 2);
    assert!(created.is_new);
    let first_primary = created.primary_image_id.expect("primary image");

    // A mirror in the other store, no photos
    let mirror = item_service::create_item(
        &state,
        admin,
        CreateItemRequest {
            name: "Espejo veneciano".into(),
            price: 90.0,
            description: Some("   ".into()),
            category: "mirror".into(),
            store: Store::Regueros,
            sold: false,
            slot1: Some(80.0),
            slot2: Some(60.0),
            slot3: Some(3.0),
            images: vec![],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(mirror.description, None);
    assert_eq!(mirror.slot3, None);
    assert_eq!(mirror.primary_image_id, None);

    // Guests filter by store and category label
    let listed = item_service::list_items(
        &state,
        Session::Guest,
        ItemQuery {
            category: Some("Mesas".into()),
            store: Some(Store::ElRastro),
            ..Default::default()
        },
    )
    .await?;
    let items = listed.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, created.id);

    let by_price = item_service::list_items(
        &state,
        Session::Guest,
        ItemQuery {
            sort: Some(ItemSort::PriceAsc),
            ..Default::default()
        },
    )
    .await?;
    let ids: Vec<_> = by_price.data.unwrap().items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![mirror.id, created.id]);

    // Images: primary first; switch primary; delete it and the survivor is promoted
    let images = image_service::list_images(&state, Session::Guest, created.id)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(images.len(), 2);
    assert!(images[0].is_primary);
    assert_eq!(images[0].id, first_primary);
    assert_eq!((images[0].width, images[0].height), (800, 400));
    let second = images[1].id;

    image_service::set_primary_image(
        &state,
        admin,
        created.id,
        SetPrimaryImageRequest { image_id: second },
    )
    .await?;
    image_service::delete_image(&state, admin, created.id, second).await?;
    let refreshed = item_service::get_item(&state, admin, created.id)
        .await?
        .data
        .unwrap();
    assert_eq!(refreshed.primary_image_id, Some(first_primary));
    assert_eq!(refreshed.image_count, 1);

    // Another item's image cannot become this item's primary
    let added = image_service::add_images(
        &state,
        admin,
        mirror.id,
        AddImagesRequest {
            images: vec![photo(50, 50)],
            make_primary: false,
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert!(added[0].is_primary);
    let err = image_service::set_primary_image(
        &state,
        admin,
        created.id,
        SetPrimaryImageRequest {
            image_id: added[0].id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // The schema refuses the cross-item reference even without the service check
    let rejected = sqlx::query("UPDATE items SET primary_image_id = $1 WHERE id = $2")
        .bind(added[0].id)
        .bind(created.id)
        .execute(&state.pool)
        .await;
    assert!(rejected.is_err());

    // Changing category re-validates the stored slots
    let err = item_service::update_item(
        &state,
        admin,
        mirror.id,
        UpdateItemRequest {
            category: Some("table".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let updated = item_service::update_item(
        &state,
        admin,
        mirror.id,
        UpdateItemRequest {
            category: Some(Category::Goblet.key().into()),
            slot3: Some(12.0),
            price: Some(95.0),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(
        updated.measurements_display,
        "80cm (height) | Base: Ø60cm | Boca: Ø12cm"
    );

    // Sold items disappear for guests
    item_service::set_sold(&state, admin, created.id, SetSoldRequest { sold: true }).await?;
    let err = item_service::get_item(&state, Session::Guest, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let sold = item_service::list_items(
        &state,
        admin,
        ItemQuery {
            sold: Some(true),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(sold.data.unwrap().items.len(), 1);

    let stats = item_service::inventory_stats(&state).await?.data.unwrap();
    assert_eq!(stats.sold, 1);
    assert_eq!(stats.available_el_rastro, 0);
    assert_eq!(stats.available_regueros, 1);

    // Export covers sold and available items, guests are turned away
    let csv = item_service::export_items(&state, admin).await?;
    let csv = String::from_utf8(csv)?;
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Mesa de roble"));
    assert!(csv.contains("Espejo veneciano"));
    assert!(csv.contains(",table,el_rastro,true,"));
    let err = item_service::export_items(&state, Session::Guest)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    // Wildcards in the search text are matched literally
    let literal = item_service::list_items(
        &state,
        admin,
        ItemQuery {
            q: Some("%".into()),
            ..Default::default()
        },
    )
    .await?;
    assert!(literal.data.unwrap().items.is_empty());

    // Delete cascades to images
    item_service::delete_item(&state, admin, created.id).await?;
    let (remaining,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM item_images WHERE item_id = $1")
            .bind(created.id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(remaining, 0);
    let err = item_service::delete_item(&state, admin, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

fn table_request(depth: Option<f64>, images: Vec<String>) -> CreateItemRequest {
    CreateItemRequest {
        name: "Mesa de roble".into(),
        price: 450.0,
        description: Some("Roble macizo".into()),
        category: "Mesa".into(),
        store: Store::ElRastro,
        sold: false,
        slot1: Some(120.0),
        slot2: Some(75.0),
        slot3: depth,
        images,
    }
}

fn photo(width: u32, height: u32) -> String {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    STANDARD.encode(buf)
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs
    sqlx::query("TRUNCATE TABLE item_images, items, audit_logs CASCADE")
        .execute(&pool)
        .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "flow-test-secret".into(),
        admin_password_hash: String::new(),
        token_ttl_hours: 1,
        max_body_bytes: 16 * 1024 * 1024,
        image_max_side: 800,
    };
    Ok(AppState::new(pool, config))
}
