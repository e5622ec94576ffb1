use std::sync::Arc;

use catalyst_api::config::ApiConfig;
use catalyst_db::{create_pool, schema::initialize_database, store::PgStore};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url, config.db_max_connections).await?;

    // Schema creation is idempotent
    initialize_database(&db_pool).await?;

    catalyst_api::start_server(config, Arc::new(PgStore::new(db_pool))).await?;

    Ok(())
}
