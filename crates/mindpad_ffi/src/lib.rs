//! Flutter bridge crate for MindPad.

pub mod api;
