//! Intent classification: is this a price-ranking request, and if so which
//! direction and how many results?
//!
//! Two modes:
//! - **llm** (default): model call with deterministic post-correction.
//! - **keywords**: rules only, no model call.
//!
//! Both fail soft: any problem yields `Intent::None`.

pub mod keywords;
pub mod llm;

use std::sync::Arc;

use async_trait::async_trait;
use sc_protocol::Intent;
use serde::Deserialize;

use crate::llm::LanguageModel;

/// Trait for classifiers that turn raw query text into an `Intent`.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify `query`. Never fails; unknown or broken input is `Intent::None`.
    async fn classify(&self, query: &str) -> Intent;

    /// Name of this classifier (for logging).
    fn mode_name(&self) -> &str;
}

/// Which classifier the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntentMode {
    #[default]
    Llm,
    Keywords,
}

impl IntentMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Some(Self::Llm),
            "keywords" | "rules" => Some(Self::Keywords),
            _ => None,
        }
    }
}

/// Build the classifier for `mode`.
pub fn build(mode: IntentMode, model: Arc<dyn LanguageModel>) -> Arc<dyn IntentClassifier> {
    match mode {
        IntentMode::Llm => Arc::new(llm::LlmIntentClassifier::new(model)),
        IntentMode::Keywords => Arc::new(keywords::KeywordIntentClassifier::new()),
    }
}

pub use keywords::KeywordIntentClassifier;
pub use llm::LlmIntentClassifier;
