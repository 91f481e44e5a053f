//! Shared test harness for E2E tests.
//!
//! Wires the chat router to `MockModel`, `MockEmbedder` and `MemoryStore`
//! and keeps handles to them so tests can assert on call counts.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sc_api::routes::build_router;
use sc_api::state::AppState;
use sc_pipeline::llm::{MockEmbedder, MockModel};
use sc_pipeline::store::MemoryStore;
use sc_pipeline::{Clients, PipelineSettings, SharedClients};
use sc_protocol::ChatRequest;

/// Query vector close to the FAQ/guide documents of the sample catalog.
pub const DOC_QUERY_VECTOR: [f32; 3] = [0.0, 0.0, 1.0];

/// End-to-end harness: router plus handles to its collaborators.
pub struct TestHarness {
    pub router: Router,
    pub model: Arc<MockModel>,
    pub embedder: Arc<MockEmbedder>,
    pub store: Arc<MemoryStore>,
}

impl TestHarness {
    /// Sample catalog (four products, two documents), default model script.
    pub fn with_sample_catalog() -> Self {
        Self::build(
            MockModel::new(),
            MockEmbedder::fixed(DOC_QUERY_VECTOR.to_vec()),
            MemoryStore::with_sample_catalog(),
            PipelineSettings::default(),
        )
    }

    pub fn build(
        model: MockModel,
        embedder: MockEmbedder,
        store: MemoryStore,
        settings: PipelineSettings,
    ) -> Self {
        let model = Arc::new(model);
        let embedder = Arc::new(embedder);
        let store = Arc::new(store);
        let clients = SharedClients::ready(Clients {
            model: model.clone(),
            embedder: embedder.clone(),
            store: store.clone(),
        });
        let router = build_router(AppState::new(clients, settings), &[]);

        Self {
            router,
            model,
            embedder,
            store,
        }
    }

    /// POST /api/chat with `{"message": text}`.
    pub async fn chat(&self, text: &str) -> (StatusCode, serde_json::Value) {
        let request = ChatRequest::new(text);
        send_raw(&self.router, serde_json::to_vec(&request).unwrap()).await
    }

    /// POST /api/chat with an arbitrary JSON body.
    pub async fn chat_json(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        send_chat(&self.router, body).await
    }

    /// Total store calls made for catalog lookup and vector retrieval.
    pub fn retrieval_calls(&self) -> usize {
        self.store.calls.retrieval_total()
    }
}

/// POST `body` to /api/chat on `router`. Returns (status, JSON body).
pub async fn send_chat(router: &Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    send_raw(router, serde_json::to_vec(&body).unwrap()).await
}

/// POST raw bytes as JSON to /api/chat.
pub async fn send_raw(router: &Router, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Store holding only name/price rows.
pub fn priced_store(prices: &[(&str, i64)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (name, price) in prices {
        store.add_product(*name, *price, "", &[]);
    }
    store
}
