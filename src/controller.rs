//! Note controller: the page state, the intents that change it, and the
//! persistence that follows every change.
//!
//! All state lives in [`AppModel`]. Intents arrive as [`Msg`] values and go
//! through [`NoteController::update`], which mutates the model, persists the
//! note collection when it changed, and returns a [`Command`] for the one
//! side effect that needs to await: asking the proxy. [`dispatch`] runs that
//! loop and never holds the controller lock across the network call, so
//! several fetches can be in flight and the last one to resolve is what the
//! page shows.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::client::{AnswerSource, ProxyReply};
use crate::error::Result;
use crate::models::Note;
use crate::notes::{export_notes, load_notes, save_notes, ExportFile};
use crate::store::KeyValueStorage;

pub const THINKING_MESSAGE: &str = "🤖 AI is thinking...";
pub const UNREACHABLE_MESSAGE: &str = "⚠️ Could not reach AI server.";
pub const ERROR_PREFIX: &str = "⚠️ Error: ";

// ============================================================================
// State
// ============================================================================

/// What the output card shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Empty,
    Thinking,
    /// Full display string, prefix included.
    Error(String),
    Answer { topic: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppModel {
    pub notes: Vec<Note>,
    pub output: Output,
    /// Bumped on every change to `notes`. Remove intents carry the revision
    /// they were rendered at so a stale index is never applied.
    pub revision: u64,
}

// ============================================================================
// Intents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Raw input from the search bar (button click or Enter).
    Submit(String),
    /// A proxy round trip for `query` finished.
    AnswerReady { query: String, reply: ProxyReply },
    /// The round trip for `query` was dropped before it finished.
    FetchAbandoned { query: String },
    AddNote { topic: String, text: String },
    RemoveNote { index: usize, revision: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Fetch(String),
}

// ============================================================================
// Controller
// ============================================================================

pub struct NoteController {
    model: AppModel,
    storage: Arc<dyn KeyValueStorage>,
}

impl NoteController {
    /// Build the controller from whatever is in storage.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let notes = load_notes(storage.as_ref());
        info!(count = notes.len(), "loaded notes");
        Self {
            model: AppModel {
                notes,
                ..AppModel::default()
            },
            storage,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn notes(&self) -> &[Note] {
        &self.model.notes
    }

    pub fn update(&mut self, msg: Msg) -> Command {
        debug!(?msg, "update");
        match msg {
            Msg::Submit(input) => {
                let query = input.trim();
                if query.is_empty() {
                    return Command::None;
                }
                self.model.output = Output::Thinking;
                Command::Fetch(query.to_string())
            }
            Msg::AnswerReady { query, reply } => {
                self.model.output = match reply {
                    ProxyReply::Answer(text) => Output::Answer { topic: query, text },
                    ProxyReply::Error(message) => Output::Error(format!("{ERROR_PREFIX}{message}")),
                    ProxyReply::Unreachable => Output::Error(UNREACHABLE_MESSAGE.to_string()),
                };
                Command::None
            }
            Msg::FetchAbandoned { query } => {
                warn!(query = %query, "answer request abandoned");
                if self.model.output == Output::Thinking {
                    self.model.output = Output::Empty;
                }
                Command::None
            }
            Msg::AddNote { topic, text } => {
                if topic.is_empty() || text.is_empty() {
                    warn!("refusing to save a note without topic or text");
                } else if let Err(e) = self.add_note(topic, text) {
                    error!(error = %e, "failed to save note");
                }
                Command::None
            }
            Msg::RemoveNote { index, revision } => {
                if revision != self.model.revision {
                    warn!(index, revision, current = self.model.revision, "stale remove ignored");
                } else if let Err(e) = self.remove_note(index) {
                    error!(error = %e, "failed to remove note");
                }
                Command::None
            }
        }
    }

    /// Append a note and persist the whole collection.
    ///
    /// If persisting fails the append is undone, so memory never runs ahead
    /// of storage.
    pub fn add_note(&mut self, topic: impl Into<String>, text: impl Into<String>) -> Result<()> {
        self.model.notes.push(Note::new(topic, text));
        if let Err(e) = save_notes(self.storage.as_ref(), &self.model.notes) {
            self.model.notes.pop();
            return Err(e);
        }
        self.model.revision += 1;
        Ok(())
    }

    /// Remove the note at `index` and persist. Out-of-range indices are a no-op.
    pub fn remove_note(&mut self, index: usize) -> Result<Option<Note>> {
        if index >= self.model.notes.len() {
            warn!(index, len = self.model.notes.len(), "remove index out of range");
            return Ok(None);
        }
        let removed = self.model.notes.remove(index);
        if let Err(e) = save_notes(self.storage.as_ref(), &self.model.notes) {
            self.model.notes.insert(index, removed);
            return Err(e);
        }
        self.model.revision += 1;
        Ok(Some(removed))
    }

    pub fn export(&self) -> ExportFile {
        export_notes(&self.model.notes)
    }
}

pub fn lock(controller: &Mutex<NoteController>) -> MutexGuard<'_, NoteController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sends [`Msg::FetchAbandoned`] if dropped while still armed.
struct PendingFetch<'a> {
    controller: &'a Mutex<NoteController>,
    query: Option<String>,
}

impl<'a> PendingFetch<'a> {
    fn arm(controller: &'a Mutex<NoteController>, query: &str) -> Self {
        Self {
            controller,
            query: Some(query.to_string()),
        }
    }

    fn disarm(mut self) {
        self.query = None;
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if let Some(query) = self.query.take() {
            lock(self.controller).update(Msg::FetchAbandoned { query });
        }
    }
}

/// Run `msg` and any follow-up it triggers to completion.
///
/// If the returned future is dropped mid-fetch (client went away), the
/// thinking indicator is cleared rather than left behind.
pub async fn dispatch(controller: &Mutex<NoteController>, answers: &dyn AnswerSource, msg: Msg) {
    let mut next = Some(msg);
    while let Some(msg) = next.take() {
        let command = lock(controller).update(msg);
        next = match command {
            Command::None => None,
            Command::Fetch(query) => {
                let pending = PendingFetch::arm(controller, &query);
                let reply = answers.ask(&query).await;
                pending.disarm();
                Some(Msg::AnswerReady { query, reply })
            }
        };
    }
}
