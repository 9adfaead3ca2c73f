use furniture_inventory::{
    catalog::{Category, Store},
    config::AppConfig,
    db::{create_pool, run_migrations},
    measurements,
};
use uuid::Uuid;

struct SeedItem {
    name: &'static str,
    description: &'static str,
    price: f64,
    category: Category,
    store: Store,
    slots: [Option<f64>; 3],
}

const ITEMS: &[SeedItem] = &[
    SeedItem {
        name: "Mesa de comedor de roble",
        description: "Roble macizo, finales del XIX",
        price: 450.0,
        category: Category::Table,
        store: Store::ElRastro,
        slots: [Some(180.0), Some(76.0), Some(90.0)],
    },
    SeedItem {
        name: "Espejo isabelino",
        description: "Marco dorado con pan de oro",
        price: 320.0,
        category: Category::Mirror,
        store: Store::Regueros,
        slots: [Some(110.0), Some(70.0), None],
    },
    SeedItem {
        name: "Copa de bronce",
        description: "Bronce patinado",
        price: 85.0,
        category: Category::Goblet,
        store: Store::ElRastro,
        slots: [Some(30.0), Some(15.0), Some(12.0)],
    },
    SeedItem {
        name: "Columna salomónica",
        description: "Madera tallada",
        price: 210.0,
        category: Category::Column,
        store: Store::Regueros,
        slots: [Some(120.0), None, None],
    },
    SeedItem {
        name: "Silla thonet",
        description: "Madera curvada, asiento de rejilla",
        price: 60.0,
        category: Category::Seat,
        store: Store::ElRastro,
        slots: [None, None, None],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let mut inserted = 0;
    for item in ITEMS {
        let [s1, s2, s3] = item.slots;
        let slots = measurements::validate(item.category, s1, s2, s3)?;

        let result = sqlx::query(
            r#"
            INSERT INTO items (id, name, price, description, category, store, slot1, slot2, slot3)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9
            WHERE NOT EXISTS (SELECT 1 FROM items WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.name)
        .bind(item.price)
        .bind(item.description)
        .bind(item.category.key())
        .bind(item.store.key())
        .bind(slots.slot1)
        .bind(slots.slot2)
        .bind(slots.slot3)
        .execute(&pool)
        .await?;
        inserted += result.rows_affected();
    }

    println!("Seeded {inserted} items");
    Ok(())
}
