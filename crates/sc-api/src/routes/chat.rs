//! Chat endpoint: one question in, one grounded reply out.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use sc_pipeline::{Pipeline, PipelineError};
use sc_protocol::{ChatReply, ChatRequest};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, MESSAGE_REQUIRED};
use crate::state::AppState;

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        let Json(request) = payload.map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "rejected chat body");
            ApiError::BadRequest(MESSAGE_REQUIRED.into())
        })?;
        let query = request
            .text()
            .ok_or_else(|| ApiError::BadRequest(MESSAGE_REQUIRED.into()))?;
        tracing::debug!(query, "chat query received");

        let clients = state.clients.get().await.map_err(PipelineError::from)?;
        let resolution = Pipeline::new(&clients, &state.settings)
            .resolve(query)
            .await?;

        Ok::<_, ApiError>(Json(ChatReply {
            reply: resolution.reply,
        }))
    }
    .instrument(span)
    .await
}
