//! AI action client.
//!
//! # Responsibility
//! - Validate input and dispatch one generation request per action.
//! - Classify failures into user-facing categories.
//!
//! # Invariants
//! - Blank input fails with `AiError::EmptyInput` before any remote call.
//! - Exactly one `TextGenerator::generate` call per non-blank request; no
//!   retry.
//! - Successful results are trimmed and never empty.

use crate::ai::action::AiActionKind;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Sampling temperature sent with every request.
pub const SAMPLING_TEMPERATURE: f64 = 0.7;

/// One request to the remote text-generation boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest<'a> {
    /// Instruction profile text.
    pub instruction: &'a str,
    /// User text to transform.
    pub input: &'a str,
    pub temperature: f64,
}

/// Transport-level failure reported by a generator.
#[derive(Debug)]
pub enum GeneratorError {
    /// Generator is not usable (for example, no API key configured).
    NotConfigured(String),
    /// Request could not be sent or the response could not be read.
    Transport(String),
    /// Remote service answered with a non-success status.
    Status { code: u16, body: String },
    /// Response body did not have the expected shape.
    MalformedResponse(String),
    /// Response carried no text.
    EmptyResponse,
}

impl Display for GeneratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured(details) => write!(f, "generator not configured: {details}"),
            Self::Transport(details) => write!(f, "transport failure: {details}"),
            Self::Status { code, body } => write!(f, "service returned status {code}: {body}"),
            Self::MalformedResponse(details) => write!(f, "malformed response: {details}"),
            Self::EmptyResponse => write!(f, "no response generated"),
        }
    }
}

impl Error for GeneratorError {}

/// Remote text-generation boundary.
pub trait TextGenerator {
    /// Performs one round trip and returns the raw generated text.
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GeneratorError>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GeneratorError> {
        (**self).generate(request)
    }
}

impl<G: TextGenerator + ?Sized> TextGenerator for Box<G> {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GeneratorError> {
        (**self).generate(request)
    }
}

/// Classified AI action failure.
#[derive(Debug)]
pub enum AiError {
    /// No text to process after trimming.
    EmptyInput,
    /// Remote call failed or returned nothing usable.
    Service(GeneratorError),
}

impl AiError {
    /// Message suitable for a dismissible UI notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Please write or select some text first.",
            Self::Service(_) => "Failed to process text with AI. Please try again.",
        }
    }
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no text to process"),
            Self::Service(err) => write!(f, "AI service error: {err}"),
        }
    }
}

impl Error for AiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyInput => None,
            Self::Service(err) => Some(err),
        }
    }
}

impl From<GeneratorError> for AiError {
    fn from(value: GeneratorError) -> Self {
        Self::Service(value)
    }
}

/// Maps action kinds onto generator requests.
pub struct AiActionClient<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> AiActionClient<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Runs one action over `text`.
    ///
    /// # Errors
    /// - `AiError::EmptyInput` when `text` is blank.
    /// - `AiError::Service` for any generator failure or a blank result.
    pub fn process(&self, text: &str, action: AiActionKind) -> Result<String, AiError> {
        if text.trim().is_empty() {
            return Err(AiError::EmptyInput);
        }

        let request = GenerationRequest {
            instruction: action.instruction(),
            input: text,
            temperature: SAMPLING_TEMPERATURE,
        };
        let started_at = Instant::now();
        let outcome = self
            .generator
            .generate(&request)
            .and_then(|raw| match raw.trim() {
                "" => Err(GeneratorError::EmptyResponse),
                trimmed => Ok(trimmed.to_string()),
            });

        match outcome {
            Ok(result) => {
                info!(
                    "event=ai_process module=ai status=ok action={} input_chars={} output_chars={} duration_ms={}",
                    action.key(),
                    text.chars().count(),
                    result.chars().count(),
                    started_at.elapsed().as_millis()
                );
                Ok(result)
            }
            Err(err) => {
                error!(
                    "event=ai_process module=ai status=error action={} duration_ms={} error={err}",
                    action.key(),
                    started_at.elapsed().as_millis()
                );
                Err(AiError::Service(err))
            }
        }
    }
}
