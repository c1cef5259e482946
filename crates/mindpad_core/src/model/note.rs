//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted in the notes snapshot.
//! - Provide lifecycle helpers that keep `last_modified` in sync with edits.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - Every title/content mutation through `edit` refreshes `last_modified`.
//! - Wire field names match the snapshot schema (`lastModified` is camelCase).

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as an opaque string: seeded and imported notes carry ids that are not
/// UUIDs, while freshly created notes use UUID v4 text.
pub type NoteId = String;

/// Id of the note seeded when no usable snapshot exists.
pub const WELCOME_NOTE_ID: &str = "welcome";
/// Title of the seeded note.
pub const WELCOME_NOTE_TITLE: &str = "Welcome to MindPad";
const WELCOME_NOTE_CONTENT: &str = "Welcome! This is your new AI-powered notebook.\n\n\
Try selecting this text and running an AI tool to summarize or rewrite it.\n\n\
MindPad uses a text-generation service to help you write better and faster.";

/// Placeholder shown for notes with an empty title.
pub const UNTITLED_NOTE_LABEL: &str = "Untitled Note";
/// Placeholder shown for notes with empty content.
pub const EMPTY_CONTENT_LABEL: &str = "No content";

/// User note persisted in the notes snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque stable id.
    pub id: NoteId,
    /// Free-form title, may be empty.
    pub title: String,
    /// Free-form body text, may be empty.
    pub content: String,
    /// Unix epoch milliseconds of the last title/content mutation.
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
}

impl Note {
    /// Creates an empty note with a generated id stamped with the current time.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            content: String::new(),
            last_modified: now_epoch_ms(),
        }
    }

    /// Builds the note seeded into an empty or unreadable store.
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_NOTE_ID.to_string(),
            title: WELCOME_NOTE_TITLE.to_string(),
            content: WELCOME_NOTE_CONTENT.to_string(),
            last_modified: now_epoch_ms(),
        }
    }

    /// Replaces title and content and refreshes `last_modified`.
    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
        self.touch();
    }

    /// Refreshes `last_modified` to now.
    ///
    /// The timestamp never moves backwards, so two edits inside the same
    /// millisecond keep the note's position in display order stable.
    pub fn touch(&mut self) {
        self.last_modified = self.last_modified.max(now_epoch_ms());
    }

    /// Title used in lists; falls back to the untitled placeholder.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_NOTE_LABEL
        } else {
            self.title.as_str()
        }
    }

    /// Content used in lists; falls back to the empty-content placeholder.
    pub fn display_content(&self) -> &str {
        if self.content.is_empty() {
            EMPTY_CONTENT_LABEL
        } else {
            self.content.as_str()
        }
    }

    /// Case-insensitive substring match on title or content.
    ///
    /// `needle_lowercase` must already be lowercased; an empty needle matches.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty()
            || self.title.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Sorts notes for display: `last_modified` descending, ties keep input order.
pub fn sort_for_display(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}
