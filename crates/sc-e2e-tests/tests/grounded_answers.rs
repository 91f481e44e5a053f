//! E2E tests for the general branch: catalog match, vector retrieval, fusion, generation.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{DOC_QUERY_VECTOR, TestHarness, send_chat};
use sc_api::routes::build_router;
use sc_api::state::AppState;
use sc_pipeline::canned::NO_INFO_REPLY;
use sc_pipeline::llm::{MockEmbedder, MockModel, OpenAiClient, OpenAiConfig};
use sc_pipeline::store::MemoryStore;
use sc_pipeline::{Clients, PipelineSettings, SharedClients};

/// A product mention puts the catalog block first and skips the product vector search.
#[tokio::test]
async fn e2e_catalog_match_grounds_answer() {
    let h = TestHarness::build(
        MockModel::new().answer_with("MyRecipeNoteの価格は¥500です。"),
        MockEmbedder::fixed(DOC_QUERY_VECTOR.to_vec()),
        MemoryStore::with_sample_catalog(),
        PipelineSettings::default(),
    );

    let (status, json) = h.chat("myrecipenote の価格は?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "MyRecipeNoteの価格は¥500です。");

    let prompt = h.model.last_answer_prompt().unwrap();
    assert!(prompt.starts_with("コンテキスト:\n【商品情報】\n商品名: MyRecipeNote\n価格: ¥500"));
    assert!(prompt.contains("機能: レシピ保存, 買い物リスト, タグ検索"));
    assert!(prompt.contains("\n---\n"));
    assert_eq!(h.store.calls.get_product.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.calls.match_products.load(Ordering::SeqCst), 0);
}

/// Without a mention, nearby products are summarized next to the documents.
#[tokio::test]
async fn e2e_semantic_products_supplement_documents() {
    let h = TestHarness::build(
        MockModel::new(),
        MockEmbedder::fixed(vec![0.8, 0.1, 0.2]),
        MemoryStore::with_sample_catalog(),
        PipelineSettings::default(),
    );

    let (status, _) = h.chat("同期ツールはありますか").await;
    assert_eq!(status, StatusCode::OK);

    let prompt = h.model.last_answer_prompt().unwrap();
    assert!(prompt.contains("[商品] SnazzySync Apps - 価格: ¥24,000"));
    assert_eq!(h.store.calls.match_products.load(Ordering::SeqCst), 1);
}

/// No catalog mention and no vector hits: fixed fallback, generator never called.
#[tokio::test]
async fn e2e_no_hits_returns_fallback() {
    let h = TestHarness::build(
        MockModel::new(),
        MockEmbedder::fixed(vec![1.0, 0.0, 0.0]),
        MemoryStore::new(),
        PipelineSettings::default(),
    );

    let (status, json) = h.chat("宇宙の始まりについて教えて").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], NO_INFO_REPLY);
    assert_eq!(h.model.answer_calls(), 0);
}

/// `query` is accepted in place of `message`.
#[tokio::test]
async fn e2e_query_field_alias() {
    let h = TestHarness::with_sample_catalog();

    let (status, json) = h.chat_json(json!({ "query": "ダウンロード方法は?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "モックの回答です。");
}

/// The real OpenAI-compatible client against a mock server, with the in-memory store.
#[tokio::test]
async fn e2e_openai_client_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("price_comparison"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"type\":\"none\"}"}}]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "マイページからダウンロードできます。"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": DOC_QUERY_VECTOR}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = OpenAiConfig {
        base_url: server.uri(),
        ..OpenAiConfig::default()
    };
    let openai = Arc::new(OpenAiClient::new("sk-test", config).unwrap());
    let clients = SharedClients::ready(Clients {
        model: openai.clone(),
        embedder: openai,
        store: Arc::new(MemoryStore::with_sample_catalog()),
    });
    let router = build_router(AppState::new(clients, PipelineSettings::default()), &[]);

    let (status, json) = send_chat(&router, json!({ "message": "購入した商品のダウンロード方法は?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "マイページからダウンロードできます。");
}
