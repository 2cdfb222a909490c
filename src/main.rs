#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use timewise::{config, errors::Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ensured."))
        .inspect_err(|e| error!("Failed to create database tables: {}", e))?;

    // 4. Seed the bootstrap admin account (if necessary)
    let seed_config = config::seed::load_default_seed_config()?;
    config::seed::seed_admin_user(&db, &seed_config.admin)
        .await
        .inspect_err(|e| error!("Failed to seed admin user: {}", e))?;

    info!("Timewise store is provisioned and ready.");
    Ok(())
}
