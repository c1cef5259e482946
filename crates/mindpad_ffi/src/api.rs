//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the editing session to Dart via FRB as plain envelopes.
//! - Own the process-wide session so UI state lives in Rust, not in widgets.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every session call returns the full refreshed view.

use mindpad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_note_store,
    ping as ping_inner, AiActionClient, AiActionKind, CoreConfig, GeminiGenerator, Selection,
    Session, SessionView, SqliteKvStore, TextGenerator,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

static SESSION: Mutex<Option<Session<SqliteKvStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    /// Title or `Untitled Note`.
    pub title: String,
    /// Content preview or `No content`.
    pub preview: String,
    /// Epoch milliseconds of the last edit.
    pub last_modified: i64,
    pub is_active: bool,
}

/// Editor state for the active note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub char_count: u32,
    pub word_count: u32,
}

/// Response envelope for every session call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    /// Whether the requested operation succeeded.
    pub ok: bool,
    /// Human-readable result or failure message.
    pub message: String,
    /// Notes matching the current search query, newest first.
    pub items: Vec<NoteItem>,
    pub active: Option<ActiveNote>,
    pub search_query: String,
    /// Dismissible AI failure message.
    pub ai_error: Option<String>,
}

impl NotesResponse {
    fn from_view(ok: bool, message: impl Into<String>, view: SessionView) -> Self {
        Self {
            ok,
            message: message.into(),
            items: view
                .items
                .into_iter()
                .map(|item| NoteItem {
                    id: item.id,
                    title: item.display_title,
                    preview: item.preview,
                    last_modified: item.last_modified,
                    is_active: item.is_active,
                })
                .collect(),
            active: view.active.map(|active| ActiveNote {
                id: active.id,
                title: active.title,
                content: active.content,
                char_count: saturating_u32(active.char_count),
                word_count: saturating_u32(active.word_count),
            }),
            search_query: view.search_query,
            ai_error: view.ai.error,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            items: Vec::new(),
            active: None,
            search_query: String::new(),
            ai_error: None,
        }
    }
}

/// Opens (or reopens) the session on a database file.
///
/// `db_path = None` uses `MINDPAD_DB_PATH` or the temp-dir default.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Replaces any previously open session.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(db_path: Option<String>) -> NotesResponse {
    let path = match db_path.map(|raw| raw.trim().to_string()) {
        Some(raw) if !raw.is_empty() => PathBuf::from(raw),
        _ => match CoreConfig::from_env() {
            Ok(config) => config.db_path,
            Err(err) => return NotesResponse::failure(format!("notes_open failed: {err}")),
        },
    };

    let store = match open_note_store(&path) {
        Ok(store) => store,
        Err(err) => return NotesResponse::failure(format!("notes_open failed: {err}")),
    };
    let session = Session::new(store);
    let view = session.view();
    let mut guard = lock_session();
    *guard = Some(session);
    NotesResponse::from_view(true, "Notes loaded.", view)
}

/// Returns the current view without changing state.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_view() -> NotesResponse {
    with_session(|session| Ok((String::new(), session.view())))
}

/// Creates an empty note and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create() -> NotesResponse {
    with_session(|session| {
        session
            .create_note()
            .map(|_| ("Note created.".to_string(), session.view()))
            .map_err(|err| format!("note_create failed: {err}"))
    })
}

/// Selects a note by id.
#[flutter_rust_bridge::frb(sync)]
pub fn note_select(note_id: String) -> NotesResponse {
    with_session(|session| {
        if session.select(note_id.as_str()) {
            Ok((String::new(), session.view()))
        } else {
            Err(format!("note not found: {note_id}"))
        }
    })
}

/// Replaces title and content of the active note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(title: String, content: String) -> NotesResponse {
    with_session(|session| {
        session
            .edit_active(title, content)
            .map(|_| (String::new(), session.view()))
            .map_err(|err| format!("note_update failed: {err}"))
    })
}

/// Deletes a note; selection falls back to the newest remaining note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NotesResponse {
    with_session(|session| match session.delete_note(note_id.as_str()) {
        Ok(true) => Ok(("Note deleted.".to_string(), session.view())),
        Ok(false) => Err(format!("note not found: {note_id}")),
        Err(err) => Err(format!("note_delete failed: {err}")),
    })
}

/// Sets the list search query.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_search(query: String) -> NotesResponse {
    with_session(|session| {
        session.set_search_query(query);
        let count = session.view().items.len();
        let message = if count == 0 {
            "No notes found.".to_string()
        } else {
            format!("Found {count} note(s).")
        };
        Ok((message, session.view()))
    })
}

/// Runs an AI action over the active note.
///
/// Input semantics:
/// - `selection_start`/`selection_end` are UTF-16 code unit offsets into the
///   active note content, as reported by Flutter's `TextSelection`.
/// - `selection_start == selection_end` (or either missing) means the whole
///   content is processed.
/// - A selection lying past the end of the content selects nothing and is
///   reported as empty input.
///
/// # FFI contract
/// - Blocking network call (up to `MINDPAD_AI_TIMEOUT_SECS`); run off the UI
///   thread.
/// - Holds the session lock until the response is spliced in. Every sync
///   call in this module waits on that lock, so the host must not issue sync
///   calls from the UI isolate while `ai_apply` is pending; disable editing
///   and render the pending state locally instead.
/// - Failures are reported both in `message` and in `ai_error`.
pub fn ai_apply(
    action: String,
    selection_start: Option<u32>,
    selection_end: Option<u32>,
) -> NotesResponse {
    let kind = match action.parse::<AiActionKind>() {
        Ok(kind) => kind,
        Err(err) => return NotesResponse::failure(err.to_string()),
    };
    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => return NotesResponse::failure(format!("ai_apply failed: {err}")),
    };
    let generator = match GeminiGenerator::new(config.ai) {
        Ok(generator) => generator,
        Err(err) => return NotesResponse::failure(format!("ai_apply failed: {err}")),
    };
    let client = AiActionClient::new(generator);

    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return NotesResponse::failure("notes session is not open");
    };
    apply_with(session, &client, kind, selection_start, selection_end)
}

fn apply_with<G: TextGenerator>(
    session: &mut Session<SqliteKvStore>,
    client: &AiActionClient<G>,
    kind: AiActionKind,
    selection_start: Option<u32>,
    selection_end: Option<u32>,
) -> NotesResponse {
    let selection = match (selection_start, selection_end, session.active_note()) {
        (Some(start), Some(end), Some(note)) => Some(Selection::from_utf16(
            note.content.as_str(),
            start as usize,
            end as usize,
        )),
        _ => None,
    };
    match session.run_ai_action(client, kind, selection) {
        Ok(_) => NotesResponse::from_view(true, format!("{kind} applied."), session.view()),
        Err(err) => {
            let message = session
                .ai_status()
                .error
                .clone()
                .unwrap_or_else(|| format!("ai_apply failed: {err}"));
            NotesResponse::from_view(false, message, session.view())
        }
    }
}

/// Clears the AI error message.
#[flutter_rust_bridge::frb(sync)]
pub fn ai_dismiss_error() -> NotesResponse {
    with_session(|session| {
        session.dismiss_ai_error();
        Ok((String::new(), session.view()))
    })
}

fn lock_session() -> MutexGuard<'static, Option<Session<SqliteKvStore>>> {
    // A poisoned lock only means a previous call panicked mid-update; the
    // session data is still the last persisted state.
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session(
    f: impl FnOnce(&mut Session<SqliteKvStore>) -> Result<(String, SessionView), String>,
) -> NotesResponse {
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return NotesResponse::failure("notes session is not open");
    };
    match f(session) {
        Ok((message, view)) => NotesResponse::from_view(true, message, view),
        Err(message) => NotesResponse::from_view(false, message, session.view()),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
