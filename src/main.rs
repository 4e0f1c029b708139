//! asknotes - ask a language model, keep the answers as notes.
//!
//! This is the entry point for the web server. One router carries both
//! components:
//!
//! - `/api/ask`: the proxy to the upstream chat-completions API
//! - everything else: the page and the note collection

use axum::{
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tracing::{info, warn};

use asknotes::config::{self, Config};
use asknotes::logging::{init_logging, Verbosity};
use asknotes::{handlers, proxy, AppState};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(Verbosity::from_env());

    let config = Config::load()?;
    let bind_addr = config.bind_addr.clone();
    let db_path = config.db_path.clone();
    let state = Arc::new(AppState::new(config)?);

    let app = Router::new()
        // Page routes
        .route("/", get(handlers::index))
        .route("/ask", post(handlers::submit))
        .route("/notes", post(handlers::add_note))
        .route("/notes/{index}/remove", post(handlers::remove_note))
        .route("/export", get(handlers::export))
        // API routes
        .route("/api/ask", any(proxy::ask))
        .route("/api/notes", get(handlers::list_notes))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("asknotes running at http://{}", bind_addr);
    info!("note store: {}", db_path.display());

    if config::api_key().is_none() {
        warn!(
            "{} is not set; /api/ask will relay upstream authentication errors",
            config::API_KEY_ENV
        );
    }

    axum::serve(listener, app).await?;
    Ok(())
}
