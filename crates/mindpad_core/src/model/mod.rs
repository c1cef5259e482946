//! Domain model for notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod note;
