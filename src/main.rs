//! Bootstrap binary: opens the store, seeds the catalog, and reports what
//! it holds.

use cotizador::config::database::get_database_url;
use cotizador::config::settings::load_default_settings;
use cotizador::errors::{Error, Result};
use cotizador::repository::Repositories;
use cotizador::store::Store;
use dotenvy::dotenv;
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

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load application settings (search tuning and the seed catalog)
    let settings = load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;

    // 4. Open the store, creating the schema on first run
    let database_url = get_database_url();
    ensure_parent_dir(&database_url)?;
    let store = Store::connect(&database_url)
        .await
        .inspect_err(|e| error!("Failed to open the store at {database_url}: {e}"))?;
    let repos = Repositories::new(&store);

    // 5. Seed the product catalog with entries not present yet
    let seeded = cotizador::usecases::products::seed_product_catalog(
        &repos.products,
        &settings.catalog,
    )
    .await
    .inspect_err(|e| error!("Failed to seed the catalog: {e}"))?;
    info!(seeded, "Catalog seeding finished.");

    // 6. Report what the store holds
    let clients = repos.clients.count().await?;
    let products = repos.products.count().await?;
    let quotes = repos.quotes.count().await?;
    info!(clients, products, quotes, "Store is ready.");

    Ok(())
}

/// `SQLite` creates a missing database file but not its parent directory
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let Some((dir, _file)) = path.rsplit_once('/') else {
        return Ok(());
    };
    if dir.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| Error::Storage {
        message: format!("could not create {dir}: {e}"),
    })
}
