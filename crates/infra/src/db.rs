//! Connection pool and migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::StoreResult;

/// Open a connection pool against `database_url`.
pub async fn connect(database_url: &str) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Apply the embedded SQL migrations.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
