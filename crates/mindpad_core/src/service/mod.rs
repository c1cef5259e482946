//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate snapshot repository calls into note collection APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_store;
