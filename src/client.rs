//! HTTP client the note controller uses to reach `/api/ask`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::models::{AskRequest, AskResponse};

/// What came back from one proxy round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyReply {
    /// `{ "answer": ... }`
    Answer(String),
    /// `{ "error": ... }`, whatever the status code.
    Error(String),
    /// No usable reply: connection failure or an unrecognised body.
    Unreachable,
}

#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn ask(&self, query: &str) -> ProxyReply;
}

/// Upper bound on one proxy round trip. Past it the proxy counts as unreachable.
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(90);

pub struct ProxyClient {
    url: String,
    timeout: Duration,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, PROXY_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AnswerSource for ProxyClient {
    async fn ask(&self, query: &str) -> ProxyReply {
        let request = AskRequest {
            query: query.to_string(),
        };

        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "could not build proxy client");
                return ProxyReply::Unreachable;
            }
        };

        let response = match client.post(&self.url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, url = %self.url, "could not reach proxy");
                return ProxyReply::Unreachable;
            }
        };

        debug!(status = %response.status(), "proxy responded");

        match response.json::<AskResponse>().await {
            Ok(body) => interpret(body),
            Err(e) => {
                error!(error = %e, "proxy reply is not JSON");
                ProxyReply::Unreachable
            }
        }
    }
}

/// An `error` field wins over `answer`; a body with neither is unusable.
fn interpret(body: AskResponse) -> ProxyReply {
    match body {
        AskResponse {
            error: Some(message),
            ..
        } if !message.is_empty() => ProxyReply::Error(message),
        AskResponse {
            answer: Some(answer),
            ..
        } => ProxyReply::Answer(answer),
        _ => ProxyReply::Unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_answer() {
        assert_eq!(
            interpret(AskResponse::answer("TCP is a transport protocol.")),
            ProxyReply::Answer("TCP is a transport protocol.".to_string())
        );
    }

    #[test]
    fn test_interpret_error_wins() {
        let body = AskResponse {
            answer: Some("ignored".to_string()),
            error: Some("Missing query".to_string()),
        };
        assert_eq!(interpret(body), ProxyReply::Error("Missing query".to_string()));
    }

    #[test]
    fn test_interpret_empty_body_is_unreachable() {
        let body: AskResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(interpret(body), ProxyReply::Unreachable);
    }

    async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/ask", addr)
    }

    #[tokio::test]
    async fn test_ask_against_live_proxy() {
        use axum::{http::StatusCode, routing::post, Json};

        let router = axum::Router::new().route(
            "/api/ask",
            post(|Json(req): Json<AskRequest>| async move {
                if req.query == "fail" {
                    (StatusCode::BAD_REQUEST, Json(AskResponse::error("Rate limited")))
                } else {
                    (StatusCode::OK, Json(AskResponse::answer(format!("echo: {}", req.query))))
                }
            }),
        );
        let client = ProxyClient::new(serve(router).await);

        assert_eq!(
            client.ask("What is TCP?").await,
            ProxyReply::Answer("echo: What is TCP?".to_string())
        );
        assert_eq!(
            client.ask("fail").await,
            ProxyReply::Error("Rate limited".to_string())
        );
    }

    #[tokio::test]
    async fn test_slow_proxy_times_out_as_unreachable() {
        use axum::routing::post;

        let router = axum::Router::new().route(
            "/api/ask",
            post(|| async {
                std::future::pending::<()>().await;
                "never"
            }),
        );
        let client = ProxyClient::with_timeout(serve(router).await, Duration::from_millis(100));
        assert_eq!(client.ask("What is TCP?").await, ProxyReply::Unreachable);
    }

    #[tokio::test]
    async fn test_unreachable_proxy() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ProxyClient::new(format!("http://{}/api/ask", addr));
        assert_eq!(client.ask("What is TCP?").await, ProxyReply::Unreachable);
    }
}
