//! HTML components: search bar, output card, notes list, base template.
//!
//! Everything here is a pure function of the controller model.

use crate::controller::{AppModel, Output, THINKING_MESSAGE};
use crate::lang::detect_language;
use crate::models::Note;
use crate::notes::{html_escape, render_markdown, EXPORT_FILENAME};

use super::styles::STYLE;

// ============================================================================
// Search Bar
// ============================================================================

/// Button click and Enter both submit the form, which posts to `/ask`.
pub fn search_bar() -> String {
    format!(
        r#"<form class="search-bar" action="/ask" method="post" onsubmit="showThinking()">
            <input type="text" name="query" placeholder="Ask anything..." autofocus>
            <button type="submit" class="icon-btn" title="Ask">🔍</button>
        </form>
        <script>
        function showThinking() {{
            document.getElementById('outputCard').innerHTML = '<p class="muted">{thinking}</p>';
        }}
        </script>"#,
        thinking = THINKING_MESSAGE,
    )
}

// ============================================================================
// Output Card
// ============================================================================

pub fn output_card(output: &Output) -> String {
    let inner = match output {
        Output::Empty => String::new(),
        Output::Thinking => format!(r#"<p class="muted">{}</p>"#, THINKING_MESSAGE),
        Output::Error(message) => format!(r#"<p class="error">{}</p>"#, html_escape(message)),
        Output::Answer { topic, text } => answer_html(topic, text),
    };

    format!(r#"<div class="output-card" id="outputCard">{}</div>"#, inner)
}

fn answer_html(topic: &str, text: &str) -> String {
    format!(
        r#"<h3 lang="{topic_lang}">{topic}</h3>
        <div class="answer" lang="{text_lang}">{answer}</div>
        <form action="/notes" method="post">
            <input type="hidden" name="topic" value="{topic_attr}">
            <input type="hidden" name="text" value="{text_attr}">
            <button type="submit" id="saveNoteBtn">Save to Notes</button>
        </form>"#,
        topic_lang = detect_language(topic).code(),
        topic = html_escape(topic),
        text_lang = detect_language(text).code(),
        answer = render_markdown(text),
        topic_attr = html_escape(topic),
        text_attr = html_escape(text),
    )
}

// ============================================================================
// Notes List
// ============================================================================

/// Each remove button posts its index together with the revision the list was
/// rendered at.
pub fn notes_list(notes: &[Note], revision: u64) -> String {
    if notes.is_empty() {
        return r#"<ul class="note-list" id="notesList"><li class="empty">No saved notes yet.</li></ul>"#
            .to_string();
    }

    let mut html = String::from(r#"<ul class="note-list" id="notesList">"#);

    for (i, note) in notes.iter().enumerate() {
        let lang = detect_language(&format!("{} {}", note.topic, note.text)).code();
        html.push_str(&format!(
            r#"<li class="note-item" lang="{lang}">
                <span><strong>{topic}</strong>: {text}</span>
                <form action="/notes/{i}/remove" method="post">
                    <input type="hidden" name="revision" value="{revision}">
                    <button type="submit" class="remove-btn" title="Remove">❌</button>
                </form>
            </li>"#,
            lang = lang,
            topic = html_escape(&note.topic),
            text = html_escape(&note.text),
            i = i,
            revision = revision,
        ));
    }

    html.push_str("</ul>");
    html
}

// ============================================================================
// Page
// ============================================================================

pub fn render_page(model: &AppModel) -> String {
    let content = format!(
        r#"<h1>Ask &amp; Note</h1>
        {search}
        {output}
        <div class="notes-header">
            <h2>Notes</h2>
            <a id="exportBtn" href="/export" download="{filename}">Export</a>
        </div>
        {notes}"#,
        search = search_bar(),
        output = output_card(&model.output),
        filename = EXPORT_FILENAME,
        notes = notes_list(&model.notes, model.revision),
    );

    // Another request is still waiting on the proxy: poll until it settles.
    let refresh = matches!(model.output, Output::Thinking);
    base_html("Ask & Note", &content, refresh)
}

pub fn base_html(title: &str, content: &str, refresh: bool) -> String {
    let refresh_meta = if refresh {
        r#"<meta http-equiv="refresh" content="2">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {refresh_meta}
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        refresh_meta = refresh_meta,
        title = html_escape(title),
        STYLE = STYLE,
        content = content,
    )
}
