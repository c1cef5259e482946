//! Note collection use-case service.
//!
//! # Responsibility
//! - Own the in-memory note collection.
//! - Mediate create/update/delete and mirror every mutation into the
//!   snapshot slot.
//!
//! # Invariants
//! - After every successful mutation the slot holds exactly `notes()`.
//! - A failed write leaves `notes()` unchanged; the next collection is only
//!   committed to memory once the slot accepted it.
//! - New notes are prepended; display order is derived, never stored.
//! - A missing or unreadable snapshot loads as the seeded welcome note.

use crate::model::note::{sort_for_display, Note, NoteId};
use crate::repo::kv_repo::{KvStore, RepoResult};
use crate::repo::snapshot_repo::{NoteSnapshotRepository, SnapshotState};
use crate::search::filter::search_notes;
use log::{info, warn};

/// How the initial collection was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot decoded as-is.
    Restored,
    /// No snapshot existed; seeded with the welcome note.
    Seeded,
    /// Snapshot was unreadable; replaced with the welcome note.
    Recovered,
}

/// Note collection synchronized to a key-value slot.
pub struct NoteStore<S: KvStore> {
    repo: NoteSnapshotRepository<S>,
    notes: Vec<Note>,
    load_outcome: LoadOutcome,
}

impl<S: KvStore> NoteStore<S> {
    /// Loads the collection from the default notes slot.
    ///
    /// # Errors
    /// - Returns `RepoError` only for storage transport failures. Missing or
    ///   corrupt snapshots are recovered by seeding the welcome note.
    pub fn load(store: S) -> RepoResult<Self> {
        Self::load_from(NoteSnapshotRepository::new(store))
    }

    /// Loads the collection through an explicit snapshot repository.
    pub fn load_from(repo: NoteSnapshotRepository<S>) -> RepoResult<Self> {
        let (notes, load_outcome) = match repo.read()? {
            SnapshotState::Decoded(notes) => (notes, LoadOutcome::Restored),
            SnapshotState::Missing => (vec![Note::welcome()], LoadOutcome::Seeded),
            SnapshotState::Corrupt(err) => {
                warn!(
                    "event=notes_load module=store status=recovered slot={} error={err}",
                    repo.key()
                );
                (vec![Note::welcome()], LoadOutcome::Recovered)
            }
        };

        let mut store = Self {
            repo,
            notes: Vec::new(),
            load_outcome,
        };
        store.commit(notes)?;
        info!(
            "event=notes_load module=store status=ok outcome={:?} note_count={}",
            store.load_outcome,
            store.notes.len()
        );
        Ok(store)
    }

    /// How the collection was obtained on load.
    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// Notes in collection order (most recently created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes in display order.
    pub fn sorted(&self) -> Vec<Note> {
        let mut notes = self.notes.clone();
        sort_for_display(&mut notes);
        notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Gets one note by id.
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Id of the first note in display order, if any.
    pub fn first_in_display_order(&self) -> Option<NoteId> {
        // `max_by_key` keeps the last maximum, so iterate in reverse to keep
        // the earliest note on ties.
        self.notes
            .iter()
            .rev()
            .max_by_key(|note| note.last_modified)
            .map(|note| note.id.clone())
    }

    /// Creates an empty note, prepends it and persists the collection.
    pub fn create(&mut self) -> RepoResult<Note> {
        let note = Note::new();
        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.push(note.clone());
        next.extend(self.notes.iter().cloned());
        self.commit(next)?;
        info!(
            "event=note_create module=store status=ok note_count={}",
            self.notes.len()
        );
        Ok(note)
    }

    /// Replaces the note with the same id and persists the collection.
    ///
    /// Returns whether a note was replaced; an unknown id still persists.
    pub fn update(&mut self, note: Note) -> RepoResult<bool> {
        let mut next = self.notes.clone();
        let replaced = match next.iter_mut().find(|current| current.id == note.id) {
            Some(current) => {
                *current = note;
                true
            }
            None => false,
        };
        self.commit(next)?;
        info!("event=note_update module=store status=ok replaced={replaced}");
        Ok(replaced)
    }

    /// Replaces title/content of one note, refreshing `last_modified`.
    ///
    /// Returns the updated note, or `None` when the id is unknown.
    pub fn edit(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> RepoResult<Option<Note>> {
        let Some(mut note) = self.get(id).cloned() else {
            return Ok(None);
        };
        note.edit(title, content);
        self.update(note.clone())?;
        Ok(Some(note))
    }

    /// Removes the note with the given id and persists the collection.
    ///
    /// Returns whether a note was removed. Selection is the caller's concern.
    pub fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let next: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();
        let removed = next.len() != self.notes.len();
        self.commit(next)?;
        info!(
            "event=note_delete module=store status=ok removed={removed} note_count={}",
            self.notes.len()
        );
        Ok(removed)
    }

    /// Case-insensitive title/content search in display order.
    pub fn search(&self, query: &str) -> Vec<Note> {
        search_notes(&self.notes, query)
    }

    /// Borrows the snapshot repository.
    pub fn repository(&self) -> &NoteSnapshotRepository<S> {
        &self.repo
    }

    fn commit(&mut self, next: Vec<Note>) -> RepoResult<()> {
        self.repo.write(&next).inspect_err(|err| {
            warn!("event=notes_persist module=store status=error error={err}");
        })?;
        self.notes = next;
        Ok(())
    }
}
