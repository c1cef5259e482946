//! Gemini `generateContent` text generator.
//!
//! # Responsibility
//! - Translate a `GenerationRequest` into one blocking HTTPS call.
//! - Extract the concatenated candidate text from the response.
//!
//! # Invariants
//! - The API key travels in the `x-goog-api-key` header, never in logs.
//! - Timeouts come from `AiConfig::timeout`; the client adds none of its own.

use crate::ai::client::{GenerationRequest, GeneratorError, TextGenerator};
use crate::config::AiConfig;
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking Gemini REST generator.
pub struct GeminiGenerator {
    client: Client,
    config: AiConfig,
}

impl GeminiGenerator {
    /// Builds a generator with a transport timeout from `config`.
    pub fn new(config: AiConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GeneratorError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    /// Full `generateContent` URL for the configured model.
    pub fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint, self.config.model
        )
    }
}

impl TextGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GeneratorError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            GeneratorError::NotConfigured("no API key configured".to_string())
        })?;

        let url = self.request_url();
        debug!(
            "event=ai_request module=ai status=start model={} input_chars={}",
            self.config.model,
            request.input.chars().count()
        );

        let response = self
            .client
            .post(url.as_str())
            .header(API_KEY_HEADER, api_key)
            .json(&build_request_body(request))
            .send()
            .map_err(|err| GeneratorError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        let body_text = response
            .text()
            .map_err(|err| GeneratorError::Transport(err.without_url().to_string()))?;
        if !status.is_success() {
            return Err(GeneratorError::Status {
                code: status.as_u16(),
                body: body_text,
            });
        }

        extract_text(&body_text)
    }
}

fn build_request_body<'a>(request: &GenerationRequest<'a>) -> GenerateContentBody<'a> {
    GenerateContentBody {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.instruction,
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: request.input,
            }],
        }],
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

/// Concatenates text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, GeneratorError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|err| GeneratorError::MalformedResponse(err.to_string()))?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GeneratorError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{build_request_body, extract_text, GeminiGenerator};
    use crate::ai::client::{GenerationRequest, GeneratorError, TextGenerator};
    use crate::config::AiConfig;

    #[test]
    fn request_body_uses_gemini_wire_shape() {
        let request = GenerationRequest {
            instruction: "be brief",
            input: "some text",
            temperature: 0.7,
        };
        let json = serde_json::to_value(build_request_body(&request)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "some text");
        assert_eq!(json["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn extract_text_joins_parts_of_first_candidate() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"Hello, "},{"text":"world"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        assert_eq!(extract_text(body).unwrap(), "Hello, world");
    }

    #[test]
    fn extract_text_classifies_empty_and_malformed_bodies() {
        assert!(matches!(
            extract_text(r#"{"candidates":[]}"#),
            Err(GeneratorError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(GeneratorError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text("<html>"),
            Err(GeneratorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_api_key_fails_before_network() {
        let generator = GeminiGenerator::new(AiConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            ..AiConfig::default()
        })
        .unwrap();
        assert_eq!(
            generator.request_url(),
            "http://127.0.0.1:9/models/gemini-2.5-flash:generateContent"
        );

        let request = GenerationRequest {
            instruction: "x",
            input: "y",
            temperature: 0.7,
        };
        assert!(matches!(
            generator.generate(&request),
            Err(GeneratorError::NotConfigured(_))
        ));
    }
}
