//! Shared application state for the Axum server.

use std::sync::Arc;

use sc_pipeline::llm::OpenAiClient;
use sc_pipeline::{Clients, InitError, PipelineSettings, SharedClients};

use crate::config::ApiConfig;
use crate::db;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Model, embedding and store clients, built once on first use.
    pub clients: Arc<SharedClients>,
    pub settings: Arc<PipelineSettings>,
}

impl AppState {
    pub fn new(clients: SharedClients, settings: PipelineSettings) -> Self {
        Self {
            clients: Arc::new(clients),
            settings: Arc::new(settings),
        }
    }

    /// Production state: clients are created from `config` on the first request.
    pub fn from_config(config: &ApiConfig) -> Self {
        let factory_config = config.clone();
        let clients = SharedClients::lazy(move || {
            let config = factory_config.clone();
            async move { connect_clients(&config).await }
        });
        Self::new(clients, config.pipeline.clone())
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, InitError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or(InitError::MissingSetting(name))
}

/// Validate credentials, build the OpenAI client and connect the database.
async fn connect_clients(config: &ApiConfig) -> Result<Clients, InitError> {
    let api_key = required(&config.openai_api_key, "OPENAI_API_KEY")?;
    let database_url = required(&config.database_url, "DATABASE_URL")?;

    let openai = Arc::new(OpenAiClient::new(api_key, config.openai.clone()).map_err(|e| {
        InitError::Connect {
            component: "openai",
            message: e.to_string(),
        }
    })?);

    tracing::info!("connecting to PostgreSQL");
    let pool = db::connect(&database_url)
        .await
        .map_err(|e| InitError::Connect {
            component: "database",
            message: e.to_string(),
        })?;

    Ok(Clients {
        model: openai.clone(),
        embedder: openai,
        store: Arc::new(db::PgStore::new(pool)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_is_reported_first() {
        let state = AppState::from_config(&ApiConfig::default());
        assert!(!state.clients.is_initialized());
        assert_eq!(
            state.clients.get().await.err(),
            Some(InitError::MissingSetting("OPENAI_API_KEY"))
        );
    }

    #[tokio::test]
    async fn missing_database_url() {
        let config = ApiConfig {
            openai_api_key: Some("sk-test".into()),
            database_url: Some("   ".into()),
            ..ApiConfig::default()
        };
        let err = connect_clients(&config).await.err();
        assert_eq!(err, Some(InitError::MissingSetting("DATABASE_URL")));
    }
}
