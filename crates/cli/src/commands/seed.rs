//! Seed the database with the demo store and a sample catalog.
//!
//! Idempotent: the store is matched by name, and products are skipped when
//! any already exist for the store.

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use navona_storefront::db;

const DEMO_STORE_NAME: &str = "Navona Demo Store";
const DEMO_STORE_DESCRIPTION: &str =
    "A modern demo e-commerce store with complete shopping functionality";

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    image: &'static str,
    stock: i32,
    category: &'static str,
    is_accept_coupon: bool,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Wireless Bluetooth Headphones",
            description: "High-quality wireless headphones with noise cancellation and 30-hour battery life.",
            price: Decimal::new(19_999, 2),
            image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500&q=80",
            stock: 50,
            category: "Electronics",
            is_accept_coupon: true,
        },
        SeedProduct {
            name: "Minimalist Watch",
            description: "Elegant minimalist watch with leather strap, perfect for any occasion.",
            price: Decimal::new(29_999, 2),
            image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=500&q=80",
            stock: 25,
            category: "Accessories",
            is_accept_coupon: false,
        },
        SeedProduct {
            name: "Organic Coffee Beans",
            description: "Premium organic coffee beans, medium roast, sourced from sustainable farms.",
            price: Decimal::new(2_499, 2),
            image: "https://images.unsplash.com/photo-1559056199-641a0ac8b55e?w=500&q=80",
            stock: 100,
            category: "Food & Beverages",
            is_accept_coupon: true,
        },
        SeedProduct {
            name: "Yoga Mat",
            description: "Professional-grade yoga mat with superior grip and cushioning.",
            price: Decimal::new(4_999, 2),
            image: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=500&q=80",
            stock: 75,
            category: "Fitness",
            is_accept_coupon: true,
        },
        SeedProduct {
            name: "Laptop Backpack",
            description: "Water-resistant laptop backpack with multiple compartments and USB charging port.",
            price: Decimal::new(8_999, 2),
            image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=500&q=80",
            stock: 40,
            category: "Bags",
            is_accept_coupon: false,
        },
        SeedProduct {
            name: "Smart Home Speaker",
            description: "Voice-controlled smart speaker with high-quality audio and smart home integration.",
            price: Decimal::new(12_999, 2),
            image: "https://images.unsplash.com/photo-1508685096489-7aacd43bd3b1?w=500&q=80",
            stock: 30,
            category: "Electronics",
            is_accept_coupon: true,
        },
    ]
}

/// Seed the demo store and its catalog.
///
/// # Errors
///
/// Returns an error if `NAVONA_DATABASE_URL` is missing or a database
/// operation fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("NAVONA_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "NAVONA_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store_id = ensure_store(&pool).await?;

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM storefront.product WHERE store_id = $1",
    )
    .bind(store_id)
    .fetch_one(&pool)
    .await?;

    if existing > 0 {
        info!("{existing} products already exist, skipping seed");
        return Ok(());
    }

    let products = sample_products();
    for product in &products {
        sqlx::query(
            r"
            INSERT INTO storefront.product
                (store_id, name, description, price, image, stock, category, is_accept_coupon)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(store_id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.image)
        .bind(product.stock)
        .bind(product.category)
        .bind(product.is_accept_coupon)
        .execute(&pool)
        .await?;
    }

    info!("Created {} products", products.len());
    Ok(())
}

/// Find the demo store by name or create it, returning its id.
async fn ensure_store(pool: &PgPool) -> Result<Uuid, sqlx::Error> {
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM storefront.store WHERE name = $1")
            .bind(DEMO_STORE_NAME)
            .fetch_optional(pool)
            .await?;

    if let Some(id) = existing {
        info!("Store already exists: {DEMO_STORE_NAME}");
        return Ok(id);
    }

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO storefront.store (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(DEMO_STORE_NAME)
    .bind(DEMO_STORE_DESCRIPTION)
    .fetch_one(pool)
    .await?;

    info!("Created store: {DEMO_STORE_NAME}");
    Ok(id)
}
