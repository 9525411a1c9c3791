//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! navona-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `NAVONA_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/storefront/migrations/`.

use secrecy::SecretString;
use tracing::info;

use navona_storefront::db;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if `NAVONA_DATABASE_URL` is missing, the database is
/// unreachable, or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("NAVONA_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "NAVONA_DATABASE_URL not set")?;

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
