//! View-model projections emitted to session observers.

use crate::model::note::{Note, NoteId};
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One row of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListItem {
    pub id: NoteId,
    /// Title or the untitled placeholder.
    pub display_title: String,
    /// Whitespace-collapsed content prefix or the empty-content placeholder.
    pub preview: String,
    pub last_modified: i64,
    pub is_active: bool,
}

/// Editor projection of the active note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNoteView {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub char_count: usize,
    pub word_count: usize,
}

/// AI action status shown next to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiStatus {
    /// A request is in flight.
    pub pending: bool,
    /// Last failure message, until dismissed.
    pub error: Option<String>,
}

/// Complete session projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Notes matching the search query, in display order.
    pub items: Vec<NoteListItem>,
    pub active: Option<ActiveNoteView>,
    pub search_query: String,
    pub ai: AiStatus,
}

impl NoteListItem {
    pub(crate) fn from_note(note: &Note, active_id: Option<&str>) -> Self {
        Self {
            id: note.id.clone(),
            display_title: note.display_title().to_string(),
            preview: derive_preview(note.display_content()),
            last_modified: note.last_modified,
            is_active: active_id == Some(note.id.as_str()),
        }
    }
}

impl ActiveNoteView {
    pub(crate) fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            char_count: note.content.chars().count(),
            word_count: word_count(&note.content),
        }
    }
}

/// Collapses whitespace and keeps the first 100 characters.
pub fn derive_preview(content: &str) -> String {
    let normalized = WHITESPACE_RE.replace_all(content.trim(), " ");
    normalized.chars().take(PREVIEW_MAX_CHARS).collect()
}

/// Counts whitespace-separated words.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}
