//! Error types for the pipeline and its collaborators.

use thiserror::Error;

/// Failures reported by a `CatalogStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query on {table} failed: {message}")]
    Query { table: &'static str, message: String },

    #[error("rpc {function} failed: {message}")]
    Rpc {
        function: &'static str,
        message: String,
    },
}

/// Failures talking to the language or embedding model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// Initialization failure of the shared clients.
///
/// Recorded once and handed back to every later caller, hence `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("required setting {0} is not configured")]
    MissingSetting(&'static str),

    #[error("failed to initialize {component}: {message}")]
    Connect {
        component: &'static str,
        message: String,
    },
}

/// Terminal failure of a request. Everything that can fail soft never shows up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("initialization failed: {0}")]
    Init(#[from] InitError),

    #[error("database error: {0}")]
    Database(#[source] StoreError),

    #[error("embedding failed: {0}")]
    Embedding(#[source] ModelError),

    #[error("generation failed: {0}")]
    Generation(#[source] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_message_names_setting() {
        let err = InitError::MissingSetting("OPENAI_API_KEY");
        assert_eq!(
            err.to_string(),
            "required setting OPENAI_API_KEY is not configured"
        );
    }

    #[test]
    fn pipeline_error_wraps_store_error() {
        let err = PipelineError::Database(StoreError::Rpc {
            function: "match_docs",
            message: "connection reset".into(),
        });
        assert!(err.to_string().contains("match_docs"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
