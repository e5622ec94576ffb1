//! PostgreSQL persistence for the timetable and roster service.
//!
//! Repositories are free functions over a [`DbPool`]. The [`store::Store`]
//! trait bundles them behind one object so the API can be driven by a mock
//! in tests.

pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}
