//! Editing session controller.
//!
//! # Responsibility
//! - Own UI state explicitly: active note, search query, AI status.
//! - Route user intents to the note store and AI client.
//! - Notify observers with a fresh `SessionView` after every state change.
//!
//! # Invariants
//! - The active id always names a live note, or is `None`.
//! - Deleting the active note selects the first remaining note in display
//!   order, or nothing when the collection is empty.
//! - `run_ai_action` holds `&mut self` for the whole round trip, so no edit
//!   can interleave with a pending request.

pub mod view;

use crate::ai::action::AiActionKind;
use crate::ai::client::{AiActionClient, AiError, TextGenerator};
use crate::ai::splice::{splice_result, text_to_process, Selection};
use crate::model::note::{Note, NoteId};
use crate::repo::kv_repo::{KvStore, RepoError, RepoResult};
use crate::service::note_store::NoteStore;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use view::{ActiveNoteView, AiStatus, NoteListItem, SessionView};

/// Callback receiving the updated view after each state change.
pub type SessionObserver = Box<dyn FnMut(&SessionView) + Send>;

/// Session-level failure.
#[derive(Debug)]
pub enum SessionError {
    /// Operation needs an active note but none is selected.
    NoActiveNote,
    /// AI action failed; the message is also recorded in `AiStatus::error`.
    Ai(AiError),
    /// Persistence failure.
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveNote => write!(f, "no active note"),
            Self::Ai(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoActiveNote => None,
            Self::Ai(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<AiError> for SessionError {
    fn from(value: AiError) -> Self {
        Self::Ai(value)
    }
}

/// Single-user editing session over a note store.
pub struct Session<S: KvStore> {
    store: NoteStore<S>,
    active_id: Option<NoteId>,
    search_query: String,
    ai: AiStatus,
    observers: Vec<SessionObserver>,
}

impl<S: KvStore> Session<S> {
    /// Starts a session with the first note in display order selected.
    pub fn new(store: NoteStore<S>) -> Self {
        let active_id = store.first_in_display_order();
        Self {
            store,
            active_id,
            search_query: String::new(),
            ai: AiStatus::default(),
            observers: Vec::new(),
        }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_id
            .as_deref()
            .and_then(|id| self.store.get(id))
    }

    pub fn search_query(&self) -> &str {
        self.search_query.as_str()
    }

    pub fn ai_status(&self) -> &AiStatus {
        &self.ai
    }

    /// Registers an observer; it is not called until the next change.
    pub fn subscribe(&mut self, observer: SessionObserver) {
        self.observers.push(observer);
    }

    /// Selects a note by id. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.store.get(id).is_none() {
            debug!("event=note_select module=session status=ignored reason=unknown_id");
            return false;
        }
        self.active_id = Some(id.to_string());
        self.ai.error = None;
        self.notify();
        true
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.notify();
    }

    /// Creates an empty note and makes it active.
    pub fn create_note(&mut self) -> RepoResult<Note> {
        let note = self.store.create()?;
        self.active_id = Some(note.id.clone());
        self.ai.error = None;
        self.notify();
        Ok(note)
    }

    /// Replaces title and content of the active note.
    pub fn edit_active(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, SessionError> {
        let id = self.active_id.clone().ok_or(SessionError::NoActiveNote)?;
        let note = self
            .store
            .edit(id.as_str(), title, content)?
            .ok_or(SessionError::NoActiveNote)?;
        self.notify();
        Ok(note)
    }

    /// Deletes a note and repairs the selection when it was active.
    pub fn delete_note(&mut self, id: &str) -> RepoResult<bool> {
        let removed = self.store.delete(id)?;
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.store.first_in_display_order();
            self.ai.error = None;
        }
        self.notify();
        Ok(removed)
    }

    /// Runs an AI action over the selection (or whole content) of the active
    /// note and splices the result back.
    ///
    /// # Errors
    /// - `NoActiveNote` when nothing is selected.
    /// - `Ai` for empty input or service failure; the user-facing message is
    ///   kept in `AiStatus::error` until dismissed.
    /// - `Repo` when the updated note cannot be persisted.
    pub fn run_ai_action<G: TextGenerator>(
        &mut self,
        client: &AiActionClient<G>,
        action: AiActionKind,
        selection: Option<Selection>,
    ) -> Result<Note, SessionError> {
        let note = self.active_note().cloned().ok_or(SessionError::NoActiveNote)?;

        self.ai = AiStatus {
            pending: true,
            error: None,
        };
        self.notify();

        let input = text_to_process(&note.content, selection);
        let outcome = client.process(input, action);
        self.ai.pending = false;

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    "event=ai_action module=session status=error action={} error={err}",
                    action.key()
                );
                self.ai.error = Some(err.user_message().to_string());
                self.notify();
                return Err(SessionError::Ai(err));
            }
        };

        let content = splice_result(&note.content, selection, action, &result);
        let edited = self.store.edit(note.id.as_str(), note.title.clone(), content);
        self.notify();
        edited?.ok_or(SessionError::NoActiveNote)
    }

    /// Clears the recorded AI error message.
    pub fn dismiss_ai_error(&mut self) {
        if self.ai.error.take().is_some() {
            self.notify();
        }
    }

    /// Builds the current view-model.
    pub fn view(&self) -> SessionView {
        let active_id = self.active_id.as_deref();
        SessionView {
            items: self
                .store
                .search(self.search_query.as_str())
                .iter()
                .map(|note| NoteListItem::from_note(note, active_id))
                .collect(),
            active: self.active_note().map(ActiveNoteView::from_note),
            search_query: self.search_query.clone(),
            ai: self.ai.clone(),
        }
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.view();
        for observer in &mut self.observers {
            observer(&view);
        }
    }
}
