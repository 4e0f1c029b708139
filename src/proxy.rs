//! The `/api/ask` proxy.
//!
//! Takes `{ "query": ... }`, forwards it to the upstream chat-completions API
//! as a two-message conversation, and relays either `{ "answer": ... }` or a
//! normalized `{ "error": ... }`. Nothing is kept between requests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{api_key, API_KEY_ENV};
use crate::error::{AskError, Result};
use crate::models::{AskResponse, ChatRequest};
use crate::AppState;

// ============================================================================
// Upstream Client
// ============================================================================

/// One request/response exchange with a chat-completions service.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Send `request`, returning the raw response body whatever the status.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

pub struct OpenRouterClient {
    http: reqwest::Client,
    url: String,
}

impl OpenRouterClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CompletionApi for OpenRouterClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        // Read on every call so a rotated key takes effect without a restart.
        let key = api_key().unwrap_or_else(|| {
            warn!("{} is not set, upstream will reject the request", API_KEY_ENV);
            String::new()
        });

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(key)
            .json(request)
            .send()
            .await?;

        debug!(status = %response.status(), "upstream responded");
        Ok(response.text().await?)
    }
}

// ============================================================================
// Proxy
// ============================================================================

pub struct Proxy {
    api: Arc<dyn CompletionApi>,
    model: String,
    system_prompt: String,
}

impl Proxy {
    pub fn new(
        api: Arc<dyn CompletionApi>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            api,
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Run one exchange. Returns the trimmed answer text.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> std::result::Result<String, AskError> {
        if *method != Method::POST {
            return Err(AskError::MethodNotAllowed);
        }

        let query = parse_query(body).ok_or(AskError::InvalidRequest)?;
        let request = ChatRequest::for_query(&self.model, &self.system_prompt, &query);

        let raw = self.api.complete(&request).await.map_err(|e| {
            error!(error = %e, "server error");
            AskError::Server
        })?;

        extract_answer(&raw)
    }
}

/// Pull a non-empty string `query` out of a JSON body.
///
/// A missing body, invalid JSON, or a `query` that is absent, not a string,
/// or empty all count as missing.
pub fn parse_query(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("query")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Interpret an upstream response body.
pub fn extract_answer(raw: &str) -> std::result::Result<String, AskError> {
    let data: Value = serde_json::from_str(raw).map_err(|e| {
        error!(error = %e, "server error: upstream body is not JSON");
        AskError::Server
    })?;

    if data.is_null() {
        error!("server error: upstream body is null");
        return Err(AskError::Server);
    }

    if let Some(err) = data.get("error").filter(|e| is_truthy(e)) {
        let message = err.get("message").and_then(Value::as_str);
        warn!(message = message.unwrap_or_default(), "upstream reported an error");
        return Err(AskError::upstream(message));
    }

    data.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
        .map(str::to_string)
        .ok_or(AskError::EmptyAnswer)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Route Handler
// ============================================================================

impl IntoResponse for AskError {
    fn into_response(self) -> Response {
        (self.status(), Json(AskResponse::error(self.message()))).into_response()
    }
}

pub async fn ask(State(state): State<Arc<AppState>>, method: Method, body: Bytes) -> Response {
    match state.proxy.handle(&method, &body).await {
        Ok(answer) => (StatusCode::OK, Json(AskResponse::answer(answer))).into_response(),
        Err(e) => e.into_response(),
    }
}
