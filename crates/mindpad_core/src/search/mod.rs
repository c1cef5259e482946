//! Note search entry points.
//!
//! # Responsibility
//! - Keep search semantics and result ordering inside core.

pub mod filter;
