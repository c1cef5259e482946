//! AI action kinds and their instruction profiles.
//!
//! # Invariants
//! - Every action maps to exactly one static instruction profile.
//! - `FromStr` accepts the stable snake_case key and the display label,
//!   case-insensitively.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed AI transformation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiActionKind {
    FixGrammar,
    Summarize,
    ContinueWriting,
    MakeLonger,
}

impl AiActionKind {
    pub const ALL: [AiActionKind; 4] = [
        Self::FixGrammar,
        Self::Summarize,
        Self::ContinueWriting,
        Self::MakeLonger,
    ];

    /// Stable machine key.
    pub fn key(self) -> &'static str {
        match self {
            Self::FixGrammar => "fix_grammar",
            Self::Summarize => "summarize",
            Self::ContinueWriting => "continue_writing",
            Self::MakeLonger => "make_longer",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FixGrammar => "Fix Grammar",
            Self::Summarize => "Summarize",
            Self::ContinueWriting => "Continue Writing",
            Self::MakeLonger => "Expand",
        }
    }

    /// System instruction sent alongside the input text.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::FixGrammar => {
                "You are a professional editor. Correct the grammar and spelling of the user's text. \
                 Return ONLY the corrected text, do not add conversational filler."
            }
            Self::Summarize => {
                "You are a helpful assistant. Summarize the following text into a concise paragraph. \
                 Return ONLY the summary."
            }
            Self::ContinueWriting => {
                "You are a creative co-writer. Continue the following text naturally, maintaining \
                 the same tone and style. Keep the addition to roughly 3-4 sentences."
            }
            Self::MakeLonger => {
                "You are a detailed writer. Expand upon the concepts in the text, adding more \
                 detail and depth. Return the expanded text."
            }
        }
    }

    /// Whether the result is inserted after the selection instead of
    /// replacing it.
    pub fn inserts_after_selection(self) -> bool {
        matches!(self, Self::ContinueWriting)
    }
}

impl Display for AiActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActionError(pub String);

impl Display for UnknownActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown AI action `{}`; expected fix_grammar|summarize|continue_writing|make_longer",
            self.0
        )
    }
}

impl Error for UnknownActionError {}

impl FromStr for AiActionKind {
    type Err = UnknownActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let kind = match normalized.as_str() {
            "fix_grammar" => Self::FixGrammar,
            "summarize" => Self::Summarize,
            "continue_writing" => Self::ContinueWriting,
            "make_longer" | "expand" => Self::MakeLonger,
            _ => return Err(UnknownActionError(value.to_string())),
        };
        Ok(kind)
    }
}
