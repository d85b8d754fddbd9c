use crate::config::get_config;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnection, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::Duration;

/// Per-connection pragmas. Foreign keys are the store's referential hook and
/// must be switched on for every connection.
async fn configure_pragmas(conn: &mut SqliteConnection) -> std::result::Result<(), sqlx::Error> {
    use sqlx::Executor;

    conn.execute("PRAGMA journal_mode = WAL").await?;
    conn.execute("PRAGMA synchronous = NORMAL").await?;
    conn.execute("PRAGMA busy_timeout = 5000").await?;
    conn.execute("PRAGMA foreign_keys = ON").await?;

    Ok(())
}

pub async fn connect_pool(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas(conn).await }))
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn create_pool() -> Result<SqlitePool> {
    let config = get_config();
    connect_pool(&config.database_url).await
}
