use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
///
/// Older clients send the text as `query`; both spellings are accepted and
/// `message` wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            query: None,
        }
    }

    /// The user's question, if one was supplied. Whitespace-only text counts as missing.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.query.as_deref().filter(|q| !q.trim().is_empty()))
    }
}

/// Successful response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_is_read() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "こんにちは"}"#).unwrap();
        assert_eq!(req.text(), Some("こんにちは"));
    }

    #[test]
    fn query_alias_is_accepted() {
        let req: ChatRequest = serde_json::from_str(r#"{"query": "価格は?"}"#).unwrap();
        assert_eq!(req.text(), Some("価格は?"));
    }

    #[test]
    fn message_wins_over_query() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "first", "query": "second"}"#).unwrap();
        assert_eq!(req.text(), Some("first"));
    }

    #[test]
    fn blank_message_falls_back_to_query() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "   ", "query": "second"}"#).unwrap();
        assert_eq!(req.text(), Some("second"));
    }

    #[test]
    fn missing_text_is_none() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text().is_none());

        let req: ChatRequest = serde_json::from_str(r#"{"message": " \n"}"#).unwrap();
        assert!(req.text().is_none());
    }

    #[test]
    fn new_request_skips_empty_alias() {
        let json = serde_json::to_string(&ChatRequest::new("hi")).unwrap();
        assert_eq!(json, r#"{"message":"hi"}"#);
    }
}
