//! AI text actions.
//!
//! # Responsibility
//! - Map action kinds onto instruction profiles.
//! - Send one request per action to a `TextGenerator` and classify failures.
//! - Splice results back into note content.
//!
//! # Invariants
//! - The client never mutates notes; splicing is applied by the caller.

pub mod action;
pub mod client;
pub mod gemini;
pub mod splice;
