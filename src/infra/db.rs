use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

/// Report requests issue three snapshot reads concurrently, so the pool is
/// sized a little above the default handful of connections.
pub async fn init_db(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Postgres connection failed (check DATABASE_URL): {e}"))?;

    info!("Connected to database");
    Ok(pool)
}
