use axum::extract::FromRef;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

use crate::config::ServerConfig;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<Pool<Sqlite>>` directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool<Sqlite>,
}

/// Create the connection pool described by the config.
///
/// Every connection registers the `REGEXP` function used by to-do search.
/// Uses `connect_lazy_with` so no connections open until the first query.
/// In-memory databases keep a single connection alive forever; every new
/// connection to `sqlite::memory:` would otherwise see an empty database.
pub fn create_pool(config: &ServerConfig) -> Result<Pool<Sqlite>, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .foreign_keys(true)
        .with_regexp();

    let mut pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5));

    if config.database_url.contains(":memory:") {
        pool = pool
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    Ok(pool.connect_lazy_with(options))
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
