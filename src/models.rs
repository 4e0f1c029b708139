//! Data models for asknotes.
//!
//! Notes and the wire shapes of the proxy endpoint and the upstream
//! chat-completions API.

use serde::{Deserialize, Serialize};

// ============================================================================
// Notes
// ============================================================================

/// A saved question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// The original query.
    pub topic: String,
    /// The answer text.
    pub text: String,
}

impl Note {
    pub fn new(topic: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            text: text.into(),
        }
    }
}

// ============================================================================
// Proxy Endpoint
// ============================================================================

/// Body sent by the note controller to `/api/ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// Body returned by `/api/ask`: exactly one of the fields is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl AskResponse {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            answer: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Upstream Chat Completions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for the upstream completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// A two-turn conversation: the system instruction, then the user's query.
    pub fn for_query(model: &str, system_prompt: &str, query: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: query.to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_response_serializes_single_field() {
        let ok = serde_json::to_value(AskResponse::answer("hi")).unwrap();
        assert_eq!(ok, serde_json::json!({ "answer": "hi" }));

        let err = serde_json::to_value(AskResponse::error("Missing query")).unwrap();
        assert_eq!(err, serde_json::json!({ "error": "Missing query" }));
    }

    #[test]
    fn test_chat_request_shape() {
        let req = ChatRequest::for_query("m", "be nice", "What is TCP?");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "messages": [
                    { "role": "system", "content": "be nice" },
                    { "role": "user", "content": "What is TCP?" }
                ]
            })
        );
    }

    #[test]
    fn test_note_json_field_names() {
        let note: Note =
            serde_json::from_str(r#"{"topic":"What is TCP?","text":"A protocol."}"#).unwrap();
        assert_eq!(note, Note::new("What is TCP?", "A protocol."));
    }
}
