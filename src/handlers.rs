//! HTTP route handlers for the page and the notes API.
//!
//! Every mutating route turns its form into a [`Msg`], hands it to the
//! controller, and redirects back to `/`.

use crate::controller::{dispatch, lock, Msg};
use crate::models::Note;
use crate::templates::render_page;
use crate::AppState;
use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

// ============================================================================
// Page
// ============================================================================

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let model = lock(&state.controller).model().clone();
    Html(render_page(&model))
}

// ============================================================================
// Intents
// ============================================================================

#[derive(Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub query: String,
}

pub async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<SubmitForm>) -> Redirect {
    dispatch(&state.controller, state.answers.as_ref(), Msg::Submit(form.query)).await;
    Redirect::to("/")
}

#[derive(Deserialize)]
pub struct AddNoteForm {
    pub topic: String,
    pub text: String,
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddNoteForm>,
) -> Redirect {
    // Browsers submit textarea/hidden-field line breaks as CRLF.
    let msg = Msg::AddNote {
        topic: normalize_newlines(&form.topic),
        text: normalize_newlines(&form.text),
    };
    dispatch(&state.controller, state.answers.as_ref(), msg).await;
    Redirect::to("/")
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}

#[derive(Deserialize)]
pub struct RemoveNoteForm {
    pub revision: u64,
}

pub async fn remove_note(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Form(form): Form<RemoveNoteForm>,
) -> Redirect {
    let msg = Msg::RemoveNote {
        index,
        revision: form.revision,
    };
    dispatch(&state.controller, state.answers.as_ref(), msg).await;
    Redirect::to("/")
}

// ============================================================================
// Export
// ============================================================================

pub async fn export(State(state): State<Arc<AppState>>) -> Response {
    let file = lock(&state.controller).export();
    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

// ============================================================================
// Notes API
// ============================================================================

pub async fn list_notes(State(state): State<Arc<AppState>>) -> Json<Vec<Note>> {
    Json(lock(&state.controller).notes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AnswerSource, ProxyReply};
    use crate::config::Config;
    use crate::controller::Output;
    use crate::error::Result;
    use crate::models::ChatRequest;
    use crate::proxy::CompletionApi;
    use crate::store::MemoryStorage;
    use async_trait::async_trait;

    struct NoUpstream;

    #[async_trait]
    impl CompletionApi for NoUpstream {
        async fn complete(&self, _request: &ChatRequest) -> Result<String> {
            panic!("page routes never reach the upstream directly");
        }
    }

    struct Echo;

    #[async_trait]
    impl AnswerSource for Echo {
        async fn ask(&self, query: &str) -> ProxyReply {
            ProxyReply::Answer(format!("answer to {}", query))
        }
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState::with_parts(
            Config::default(),
            Arc::new(NoUpstream),
            Arc::new(Echo),
            Arc::new(MemoryStorage::new()),
        ))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_submit_then_index_shows_answer() {
        let state = state();
        let redirect = submit(
            State(state.clone()),
            Form(SubmitForm {
                query: " What is TCP? ".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);

        let Html(page) = index(State(state)).await;
        assert!(page.contains("What is TCP?"));
        assert!(page.contains("answer to What is TCP?"));
        assert!(page.contains("Save to Notes"));
    }

    #[tokio::test]
    async fn test_add_remove_and_list() {
        let state = state();
        for (topic, text) in [("a", "1"), ("b", "2"), ("c", "3")] {
            let redirect = add_note(
                State(state.clone()),
                Form(AddNoteForm {
                    topic: topic.to_string(),
                    text: text.to_string(),
                }),
            )
            .await
            .into_response();
            assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        }

        let revision = lock(&state.controller).model().revision;
        let redirect = remove_note(
            State(state.clone()),
            Path(1),
            Form(RemoveNoteForm { revision }),
        )
        .await
        .into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);

        let Json(notes) = list_notes(State(state.clone())).await;
        assert_eq!(notes, vec![Note::new("a", "1"), Note::new("c", "3")]);
        // Saving a note never changes what the output card shows.
        assert_eq!(lock(&state.controller).model().output, Output::Empty);
    }

    #[tokio::test]
    async fn test_add_note_stores_form_line_breaks_as_lf() {
        let state = state();
        let redirect = add_note(
            State(state.clone()),
            Form(AddNoteForm {
                topic: "What is TCP?".to_string(),
                text: "TCP is:\r\n\r\n- reliable\r\n- ordered".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);

        let Json(notes) = list_notes(State(state.clone())).await;
        assert_eq!(
            notes,
            vec![Note::new("What is TCP?", "TCP is:\n\n- reliable\n- ordered")]
        );

        let body = body_string(export(State(state)).await).await;
        assert!(!body.contains('\r'));
    }

    #[tokio::test]
    async fn test_export_is_attachment_with_bom() {
        let state = state();
        lock(&state.controller)
            .add_note("What is TCP?", "TCP is a transport protocol.")
            .unwrap();

        let response = export(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain;charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"notes.txt\""
        );

        let body = body_string(response).await;
        assert_eq!(body, "\u{FEFF}What is TCP?\nTCP is a transport protocol.\n");
    }
}
