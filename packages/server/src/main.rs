use anyhow::Context;
use tracing_subscriber::EnvFilter;

use shelter::config::AppConfig;
use shelter::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = shelter::database::init_db(&config.database.url)
        .await
        .context("failed to initialize the database")?;

    shelter::seed::ensure_indexes(&db).await?;
    shelter::seed::bootstrap_superuser(&db, &config.bootstrap).await;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = shelter::build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Shelter listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
