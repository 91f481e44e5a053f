//! Unified API error type with Axum `IntoResponse` support.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sc_pipeline::PipelineError;
use serde_json::json;

/// 400 body when the request carries no question.
pub const MESSAGE_REQUIRED: &str = "メッセージが必要です。";
/// 500 body when the shared clients could not be initialized.
pub const NOT_INITIALIZED: &str = "サーバーが正しく初期化されていません。";
/// 500 body for every other failure.
pub const INTERNAL_ERROR: &str = "内部サーバーエラーが発生しました。";

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Shared client initialization failed; the detail is logged, not returned.
    #[error("not initialized: {0}")]
    Unavailable(String),

    /// Any other failure; the detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Init(e) => ApiError::Unavailable(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unavailable(detail) => {
                tracing::error!(error = %detail, "request rejected: clients not initialized");
                (StatusCode::INTERNAL_SERVER_ERROR, NOT_INITIALIZED.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };

        let body = json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;

/// `CatchPanicLayer` handler: log the panic and answer with the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
