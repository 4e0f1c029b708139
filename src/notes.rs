//! Note collection persistence, export, and content rendering helpers.

use pulldown_cmark::Parser;
use tracing::warn;

use crate::error::Result;
use crate::models::Note;
use crate::store::KeyValueStorage;

// ============================================================================
// Constants
// ============================================================================

/// Storage key holding the serialized note collection.
pub const STORAGE_KEY: &str = "ai_notes_v1";

pub const EXPORT_FILENAME: &str = "notes.txt";
pub const EXPORT_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Line placed between exported notes.
pub const EXPORT_DELIMITER: &str = "----------------";

/// Prepended to exports so editors that sniff encoding pick UTF-8.
pub const UTF8_BOM: char = '\u{FEFF}';

// ============================================================================
// Persistence
// ============================================================================

/// Load the note collection.
///
/// Absent, `null`, unreadable or malformed data all load as an empty
/// collection. The stored value is not touched; the next save overwrites it.
pub fn load_notes(storage: &dyn KeyValueStorage) -> Vec<Note> {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "could not read stored notes, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Option<Vec<Note>>>(&raw) {
        Ok(notes) => notes.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "stored notes are malformed, starting empty");
            Vec::new()
        }
    }
}

/// Overwrite the stored collection with `notes`.
pub fn save_notes(storage: &dyn KeyValueStorage, notes: &[Note]) -> Result<()> {
    let json = serde_json::to_string(notes)?;
    storage.set_item(STORAGE_KEY, &json)
}

// ============================================================================
// Export
// ============================================================================

/// A file handed to the browser as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Plain-text export: `topic`, `text`, blank line per note, notes separated by
/// [`EXPORT_DELIMITER`], the whole thing prefixed with [`UTF8_BOM`].
pub fn export_text(notes: &[Note]) -> String {
    let separator = format!("\n{}\n", EXPORT_DELIMITER);
    let body = notes
        .iter()
        .map(|n| format!("{}\n{}\n", n.topic, n.text))
        .collect::<Vec<_>>()
        .join(separator.as_str());

    let mut out = String::with_capacity(body.len() + UTF8_BOM.len_utf8());
    out.push(UTF8_BOM);
    out.push_str(&body);
    out
}

pub fn export_notes(notes: &[Note]) -> ExportFile {
    ExportFile {
        filename: EXPORT_FILENAME,
        content_type: EXPORT_CONTENT_TYPE,
        bytes: export_text(notes).into_bytes(),
    }
}

// ============================================================================
// HTML Helpers
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new(content);
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    // Model output is untrusted: strip raw HTML and scripts
    ammonia::clean(&html_output)
}
