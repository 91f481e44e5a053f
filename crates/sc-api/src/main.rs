//! Showcase chat API server.

use sc_api::config::ApiConfig;
use sc_api::routes;
use sc_api::state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sc-api starting");

    let config = ApiConfig::load()?;
    if config.openai_api_key.is_none() || config.database_url.is_none() {
        tracing::warn!("OPENAI_API_KEY or DATABASE_URL not set, chat requests will fail");
    }
    tracing::info!(
        chat_model = %config.openai.chat_model,
        intent_mode = ?config.pipeline.intent_mode,
        "configuration loaded"
    );

    let state = AppState::from_config(&config);
    let app = routes::build_router(state, &config.cors_origins);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
