use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    farmgate_observability::init();

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set (postgres://...)")?;
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let pool = farmgate_infra::connect(&database_url)
        .await
        .context("failed to connect to postgres")?;
    farmgate_infra::run_migrations(&pool).await?;

    let app = farmgate_api::app::build_app(pool, jwt_secret);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
