pub mod create;
pub mod orders;
pub mod products;

pub use create::*;
pub use orders::*;
pub use products::*;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

/// Open a pool for `url`, creating the database file if it does not exist.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    info!("Opening database: {}", url);

    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// A single-connection in-memory database. Every connection to
/// `sqlite::memory:` is its own database, so the pool is capped at one and
/// the connection is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}
