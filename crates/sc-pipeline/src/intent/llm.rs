//! Model-backed intent classifier with rule-based correction.
//!
//! The model decides *whether* the query is a price ranking. Its `sort` and
//! `limit` are only trusted after validation:
//! - `sort` must be exactly `"asc"` or `"desc"`, else it is re-derived from
//!   the query wording (default ascending).
//! - `limit` is used when it is an integer; otherwise the count phrase in the
//!   query ("3つ", "top 5") is used, otherwise 1. The result is clamped to 1..=10.

use std::sync::Arc;

use async_trait::async_trait;
use sc_protocol::{Intent, SortOrder};
use serde::Deserialize;

use super::IntentClassifier;
use crate::extract;
use crate::llm::LanguageModel;

/// Instruction sent with every classification request.
pub const SYSTEM_PROMPT: &str = r#"あなたはECサイト「Portfolio Showcase」の問い合わせ分類器です。ユーザーの質問が、商品を価格で並べた結果(最安・最高額・安い順・高い順など)を求めているかを判定してください。

次のどちらかのJSONオブジェクトだけを出力してください(説明文やマークダウンは不要):
{"type":"price_comparison","sort":"asc"|"desc","limit":N}
{"type":"none"}

- 安い商品を求める場合は "asc"、高い商品を求める場合は "desc"
- limit は求められている件数(1〜10)。件数の指定がなければ 1
- 特定の商品の価格を尋ねているだけの場合や、価格と関係のない質問は {"type":"none"}"#;

/// Expected JSON shape from the model. Fields are loose on purpose and validated after parsing.
#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    sort: Option<serde_json::Value>,
    #[serde(default)]
    limit: Option<serde_json::Value>,
}

/// Classifier that asks the language model and corrects its answer.
pub struct LlmIntentClassifier {
    model: Arc<dyn LanguageModel>,
}

impl LlmIntentClassifier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    #[tracing::instrument(skip_all, fields(model = self.model.model_name()))]
    async fn classify(&self, query: &str) -> Intent {
        let raw = match self.model.complete(SYSTEM_PROMPT, query).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "intent classification failed, assuming no intent");
                return Intent::None;
            }
        };

        let intent = resolve(query, &raw);
        tracing::info!(?intent, "intent resolved");
        intent
    }

    fn mode_name(&self) -> &str {
        "llm"
    }
}

/// Turn raw model output into a validated `Intent`.
pub fn resolve(query: &str, raw: &str) -> Intent {
    let Some(json) = extract_json_object(raw) else {
        tracing::debug!(raw = %raw, "no JSON object in classifier output");
        return Intent::None;
    };

    let parsed: RawIntent = match serde_json::from_str(json) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, raw = %raw, "classifier output is not a valid intent");
            return Intent::None;
        }
    };

    if parsed.kind != "price_comparison" {
        return Intent::None;
    }

    let sort = parsed
        .sort
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(SortOrder::from_wire)
        .unwrap_or_else(|| extract::direction(query).unwrap_or_default());

    let limit = parsed
        .limit
        .as_ref()
        .and_then(integral)
        .or_else(|| extract::quantity(query))
        .unwrap_or(1);

    Intent::price_comparison(sort, limit)
}

/// Accept integers, integral floats and numeric strings.
fn integral(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract the first top-level `{...}` block, skipping braces inside string literals.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
