//! Rule-only intent classifier. No model call, sub-millisecond.

use async_trait::async_trait;
use sc_protocol::Intent;

use super::IntentClassifier;
use crate::extract;

/// Recognizes a price ranking when the query has a price direction
/// ("安い", "expensive", ...) together with a ranking cue or an explicit count.
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, query: &str) -> Intent {
        classify_keywords(query)
    }

    fn mode_name(&self) -> &str {
        "keywords"
    }
}

fn classify_keywords(query: &str) -> Intent {
    let Some(sort) = extract::direction(query) else {
        return Intent::None;
    };
    let count = extract::quantity(query);
    if count.is_none() && !extract::has_ranking_cue(query) {
        return Intent::None;
    }
    Intent::price_comparison(sort, count.unwrap_or(1))
}
