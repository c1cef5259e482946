//! Core domain logic for MindPad.
//! This crate is the single source of truth for note and AI-action invariants.

pub mod ai;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod session;

pub use ai::action::{AiActionKind, UnknownActionError};
pub use ai::client::{
    AiActionClient, AiError, GenerationRequest, GeneratorError, TextGenerator,
    SAMPLING_TEMPERATURE,
};
pub use ai::gemini::GeminiGenerator;
pub use ai::splice::{splice_result, text_to_process, Selection};
pub use config::{AiConfig, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, WELCOME_NOTE_ID, WELCOME_NOTE_TITLE};
pub use repo::kv_repo::{KvStore, MemoryKvStore, RepoError, RepoResult, SqliteKvStore};
pub use repo::snapshot_repo::{
    NoteSnapshotRepository, PersistenceDecodeError, SnapshotState, NOTES_SLOT_KEY,
};
pub use search::filter::search_notes;
pub use service::note_store::{LoadOutcome, NoteStore};
pub use session::view::{ActiveNoteView, AiStatus, NoteListItem, SessionView};
pub use session::{Session, SessionError, SessionObserver};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Opens the SQLite-backed note store at `path`.
///
/// # Errors
/// - Storage bootstrap or migration failures.
pub fn open_note_store(
    path: impl AsRef<std::path::Path>,
) -> RepoResult<NoteStore<SqliteKvStore>> {
    let conn = db::open_db(path)?;
    NoteStore::load(SqliteKvStore::try_new(conn)?)
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
