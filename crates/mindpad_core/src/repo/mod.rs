//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the host environment provides.
//! - Isolate SQLite and JSON encoding details from the note store.
//!
//! # Invariants
//! - Repository APIs distinguish transport errors (`RepoError`) from
//!   unreadable snapshot data (`PersistenceDecodeError`).

pub mod kv_repo;
pub mod snapshot_repo;
