//! Notes snapshot codec on top of a key-value slot.
//!
//! # Responsibility
//! - Serialize the whole note collection into one named slot.
//! - Classify slot contents as missing, decoded, or corrupt.
//!
//! # Invariants
//! - Writes always replace the full collection; there is no partial update.
//! - Decoding never fails the caller: unreadable data is reported as
//!   `SnapshotState::Corrupt` so the store can recover.

use crate::model::note::Note;
use crate::repo::kv_repo::{KvStore, RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the JSON-encoded note collection.
pub const NOTES_SLOT_KEY: &str = "mindpad_notes";

/// Stored snapshot could not be decoded into notes.
#[derive(Debug)]
pub struct PersistenceDecodeError {
    source: serde_json::Error,
}

impl Display for PersistenceDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "persisted notes snapshot is unreadable: {}", self.source)
    }
}

impl Error for PersistenceDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Classified contents of the notes slot.
#[derive(Debug)]
pub enum SnapshotState {
    /// Slot was never written.
    Missing,
    /// Slot holds a valid collection (possibly empty).
    Decoded(Vec<Note>),
    /// Slot holds data that is not a valid collection.
    Corrupt(PersistenceDecodeError),
}

/// Reads and writes the notes snapshot slot.
pub struct NoteSnapshotRepository<S: KvStore> {
    store: S,
    key: String,
}

impl<S: KvStore> NoteSnapshotRepository<S> {
    /// Uses the default `mindpad_notes` slot.
    pub fn new(store: S) -> Self {
        Self::with_key(store, NOTES_SLOT_KEY)
    }

    /// Uses a caller-provided slot name.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Slot name this repository reads and writes.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Reads and classifies the slot contents.
    pub fn read(&self) -> RepoResult<SnapshotState> {
        let Some(raw) = self.store.get(self.key.as_str())? else {
            return Ok(SnapshotState::Missing);
        };

        Ok(match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => SnapshotState::Decoded(notes),
            Err(source) => SnapshotState::Corrupt(PersistenceDecodeError { source }),
        })
    }

    /// Replaces the slot with the given collection.
    pub fn write(&mut self, notes: &[Note]) -> RepoResult<()> {
        let encoded = serde_json::to_string(notes).map_err(RepoError::Encode)?;
        self.store.set(self.key.as_str(), encoded.as_str())
    }

    /// Borrows the underlying slot store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
