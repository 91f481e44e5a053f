//! Scripted model stand-ins for tests and offline development.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Embedder, LanguageModel};
use crate::error::ModelError;
use crate::intent::llm::SYSTEM_PROMPT as CLASSIFIER_PROMPT;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

impl Scripted {
    fn produce(&self) -> Result<String, ModelError> {
        match self {
            Self::Reply(text) => Ok(text.clone()),
            Self::Fail(message) => Err(ModelError::Transport(message.clone())),
        }
    }
}

/// A language model that answers classification and generation prompts from a script.
///
/// Classification calls are recognized by the classifier's system prompt;
/// everything else counts as answer generation.
pub struct MockModel {
    classification: Scripted,
    answer: Scripted,
    classify_calls: AtomicUsize,
    answer_calls: AtomicUsize,
    last_answer_prompt: Mutex<Option<String>>,
}

impl MockModel {
    /// Classifies everything as `{"type":"none"}` and answers with a fixed sentence.
    pub fn new() -> Self {
        Self {
            classification: Scripted::Reply(r#"{"type":"none"}"#.into()),
            answer: Scripted::Reply("モックの回答です。".into()),
            classify_calls: AtomicUsize::new(0),
            answer_calls: AtomicUsize::new(0),
            last_answer_prompt: Mutex::new(None),
        }
    }

    /// Raw text returned for classification prompts.
    pub fn classify_with(mut self, raw: impl Into<String>) -> Self {
        self.classification = Scripted::Reply(raw.into());
        self
    }

    pub fn classify_fails(mut self) -> Self {
        self.classification = Scripted::Fail("mock classifier unavailable".into());
        self
    }

    pub fn answer_with(mut self, text: impl Into<String>) -> Self {
        self.answer = Scripted::Reply(text.into());
        self
    }

    pub fn answer_fails(mut self) -> Self {
        self.answer = Scripted::Fail("mock generator unavailable".into());
        self
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn answer_calls(&self) -> usize {
        self.answer_calls.load(Ordering::SeqCst)
    }

    /// User message of the most recent generation call.
    pub fn last_answer_prompt(&self) -> Option<String> {
        self.last_answer_prompt
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError> {
        if system == CLASSIFIER_PROMPT {
            self.classify_calls.fetch_add(1, Ordering::SeqCst);
            return self.classification.produce();
        }

        self.answer_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_answer_prompt.lock() {
            *last = Some(user.to_string());
        }
        self.answer.produce()
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// An embedder that always returns the same vector (or always fails).
pub struct MockEmbedder {
    vector: Option<Vec<f32>>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn fixed(vector: Vec<f32>) -> Self {
        Self {
            vector: Some(vector),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vector
            .clone()
            .ok_or_else(|| ModelError::Transport("mock embedder unavailable".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_by_system_prompt() {
        let model = MockModel::new()
            .classify_with(r#"{"type":"price_comparison","sort":"asc"}"#)
            .answer_with("answer");

        let raw = model.complete(CLASSIFIER_PROMPT, "q").await.unwrap();
        assert!(raw.contains("price_comparison"));
        assert_eq!(model.complete("other", "context").await.unwrap(), "answer");

        assert_eq!(model.classify_calls(), 1);
        assert_eq!(model.answer_calls(), 1);
        assert_eq!(model.last_answer_prompt().as_deref(), Some("context"));
    }

    #[tokio::test]
    async fn failing_embedder_counts_calls() {
        let embedder = MockEmbedder::failing();
        assert!(embedder.embed("x").await.is_err());
        assert_eq!(embedder.calls(), 1);
    }
}
