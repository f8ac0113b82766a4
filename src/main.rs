use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use safepay::app;
use safepay::config::AppConfig;
use safepay::db;
use safepay::services::auth::local::LocalAuthProvider;
use safepay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let (session_tx, _) = broadcast::channel(256);

    let state = Arc::new(AppState {
        db: Arc::clone(&db),
        config: config.clone(),
        auth: Box::new(LocalAuthProvider::new(db, config.auth_shared_secret.clone())),
        session_tx,
    });

    if config.auth_shared_secret.is_empty() {
        tracing::warn!("AUTH_SHARED_SECRET is not set; sign-in is disabled");
    }

    tracing::info!(
        page_size = config.statement_page_size,
        sample_fallback = config.statement_sample_fallback,
        "statement settings"
    );

    let app = app::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
