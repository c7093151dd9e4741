use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use devcamper::logging::init_tracing;
use devcamper::router::init_router;
use devcamper::state::AppState;
use devcamper_config::AppConfig;
use devcamper_db::{init_db_pool, run_migrations};
use dotenvy::dotenv;
use tracing::info;

/// How often idle rate-limit buckets are dropped.
const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("failed to create the log directory")?;

    let app_config = AppConfig::from_env();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let db = init_db_pool(&database_url)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&db).await.context("failed to run migrations")?;

    let state = AppState::from_env(db);
    info!(?state, "Application state ready");

    let limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });

    let app = init_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        environment = %app_config.environment,
        port = app_config.port,
        "Server running; Swagger UI at /swagger-ui, Scalar at /scalar"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
