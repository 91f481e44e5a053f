//! Model contracts: chat completion and text embedding.
//!
//! `OpenAiClient` speaks the OpenAI-compatible HTTP API and implements both.
//! `mock` holds scripted stand-ins for tests and local development.

pub mod mock;
pub mod openai;

use async_trait::async_trait;

use crate::error::ModelError;

/// Chat-completion model: system instruction + user message in, generated text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError>;

    /// Model identifier (for logging).
    fn model_name(&self) -> &str;
}

/// Embedding model: text in, fixed-dimension vector out.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError>;
}

pub use mock::{MockEmbedder, MockModel};
pub use openai::{OpenAiClient, OpenAiConfig};
