//! Process-wide model/embedding/store clients, initialized at most once.
//!
//! The first request to call `SharedClients::get` runs the factory; concurrent
//! first callers wait on the same initialization. The outcome, success or
//! failure, is stored and handed to every later caller. A failed
//! initialization is never retried.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::InitError;
use crate::llm::{Embedder, LanguageModel};
use crate::store::CatalogStore;

/// The external collaborators the pipeline talks to.
#[derive(Clone)]
pub struct Clients {
    pub model: Arc<dyn LanguageModel>,
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn CatalogStore>,
}

/// Builds the clients on first use.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn build(&self) -> Result<Clients, InitError>;
}

#[async_trait]
impl<F, Fut> ClientFactory for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Clients, InitError>> + Send + 'static,
{
    async fn build(&self) -> Result<Clients, InitError> {
        (self)().await
    }
}

/// Lazily initialized, shared handle to `Clients`.
pub struct SharedClients {
    factory: Option<Arc<dyn ClientFactory>>,
    cell: Arc<OnceCell<Result<Arc<Clients>, InitError>>>,
}

impl SharedClients {
    /// Defer construction to the first `get`.
    pub fn lazy(factory: impl ClientFactory + 'static) -> Self {
        Self {
            factory: Some(Arc::new(factory)),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Already-built clients, for hosts that construct them before serving traffic.
    pub fn ready(clients: Clients) -> Self {
        Self {
            factory: None,
            cell: Arc::new(OnceCell::new_with(Some(Ok(Arc::new(clients))))),
        }
    }

    /// A handle whose initialization already failed with `error`.
    pub fn failed(error: InitError) -> Self {
        Self {
            factory: None,
            cell: Arc::new(OnceCell::new_with(Some(Err(error)))),
        }
    }

    /// The shared clients, initializing them on the first call.
    ///
    /// Initialization runs on its own task, so dropping the caller that
    /// started it does not abort it; later callers wait for the same result.
    pub async fn get(&self) -> Result<Arc<Clients>, InitError> {
        if let Some(outcome) = self.cell.get() {
            return outcome.clone();
        }

        let cell = self.cell.clone();
        let factory = self.factory.clone();
        let task = tokio::spawn(async move {
            cell.get_or_init(|| initialize(factory)).await.clone()
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(InitError::Connect {
                component: "clients",
                message: format!("initialization task failed: {e}"),
            }),
        }
    }

    /// Whether initialization has run (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

async fn initialize(
    factory: Option<Arc<dyn ClientFactory>>,
) -> Result<Arc<Clients>, InitError> {
    let Some(factory) = factory else {
        return Err(InitError::Connect {
            component: "clients",
            message: "no client factory configured".into(),
        });
    };

    tracing::info!("initializing shared clients");
    match factory.build().await {
        Ok(clients) => {
            tracing::info!(model = clients.model.model_name(), "shared clients ready");
            Ok(Arc::new(clients))
        }
        Err(e) => {
            tracing::error!(error = %e, "shared client initialization failed");
            Err(e)
        }
    }
}
