use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use booking_hub::config::AppConfig;
use booking_hub::db;
use booking_hub::handlers;
use booking_hub::services::clock::SystemClock;
use booking_hub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    if config.ops_token == "changeme" {
        tracing::warn!("OPS_TOKEN is not set, operations routes use the default token");
    }

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        clock: Box::new(SystemClock),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
