//! asknotes library - re-exports for testing and the server binary.
//!
//! Two components share this crate:
//!
//! - the `/api/ask` proxy (`proxy`), a stateless relay to an upstream
//!   chat-completions API;
//! - the note controller (`controller`, `handlers`, `templates`), which owns
//!   the page state and the saved note collection and talks to the proxy
//!   over HTTP through `client`.

use std::sync::{Arc, Mutex};

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod lang;
pub mod logging;
pub mod models;
pub mod notes;
pub mod proxy;
pub mod store;
pub mod templates;

use client::{AnswerSource, ProxyClient};
use config::Config;
use controller::NoteController;
use proxy::{CompletionApi, OpenRouterClient, Proxy};
use store::{KeyValueStorage, SledStorage};

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: Config,
    /// Stateless; shared by every `/api/ask` request.
    pub proxy: Proxy,
    /// How the controller reaches the proxy.
    pub answers: Arc<dyn AnswerSource>,
    pub controller: Mutex<NoteController>,
}

impl AppState {
    /// Wire the production parts: sled storage, OpenRouter upstream, HTTP proxy client.
    pub fn new(config: Config) -> error::Result<Self> {
        let storage = SledStorage::open(&config.db_path)?;
        let upstream = OpenRouterClient::new(config.upstream_url.clone());
        let answers = ProxyClient::new(config.proxy_endpoint());
        Ok(Self::with_parts(
            config,
            Arc::new(upstream),
            Arc::new(answers),
            Arc::new(storage),
        ))
    }

    pub fn with_parts(
        config: Config,
        upstream: Arc<dyn CompletionApi>,
        answers: Arc<dyn AnswerSource>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let proxy = Proxy::new(upstream, config.model.clone(), config.system_prompt.clone());
        Self {
            proxy,
            answers,
            controller: Mutex::new(NoteController::load(storage)),
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(upstream: Arc<dyn CompletionApi>) -> Self {
        let config = Config::default();
        let answers = ProxyClient::new(config.proxy_endpoint());
        Self::with_parts(
            config,
            upstream,
            Arc::new(answers),
            Arc::new(store::MemoryStorage::new()),
        )
    }
}

// Re-export commonly used types
pub use client::ProxyReply;
pub use controller::{dispatch, AppModel, Command, Msg, Output};
pub use error::{AskError, Error, Result};
pub use lang::{detect_language, Language};
pub use models::{AskRequest, AskResponse, ChatMessage, ChatRequest, Note, Role};
pub use notes::{
    export_notes, export_text, html_escape, load_notes, render_markdown, save_notes, ExportFile,
    EXPORT_DELIMITER, EXPORT_FILENAME, STORAGE_KEY, UTF8_BOM,
};
pub use store::MemoryStorage;
