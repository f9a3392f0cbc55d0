//! Generative-AI client.
//!
//! The portal only ever asks for one thing: given a system instruction and a
//! single user turn (text and optionally one image), produce text. That seam is
//! [`TextGenerator`]; [`GeminiClient`] is the HTTP implementation.

use crate::config::AiConfig;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key was configured, so no request was made.
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    Request(String),

    #[error("AI response error: status {status}")]
    Response { status: u16, body: String },

    #[error("AI response parse failed: {0}")]
    Parse(String),

    #[error("AI returned no text")]
    EmptyResponse,

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Text-only turns.
    Text,
    /// Turns carrying an image.
    Vision,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    InlineData { mime_type: String, data: String },
}

impl Part {
    pub fn image(mime_type: &str, bytes: &[u8]) -> Self {
        Part::InlineData {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// One user turn plus generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: ModelKind,
    pub parts: Vec<Part>,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            model: ModelKind::Text,
            parts: vec![Part::Text(prompt.into())],
            system_instruction: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Part::InlineData { .. }))
    }
}

/// Blocking text generation. Called from worker threads, never the UI thread.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError>;
}

/// Stand-in used when no API key is configured. Every turn fails, which the
/// widgets turn into their apology message.
#[derive(Debug, Default)]
pub struct DisabledGenerator;

impl TextGenerator for DisabledGenerator {
    fn generate(&self, _request: &GenerateRequest) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}

pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::NotConfigured)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
        })
    }

    fn model_name(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Text => &self.text_model,
            ModelKind::Vision => &self.vision_model,
        }
    }

    fn send_json(&self, model: &str, body: &impl Serialize) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| AiError::Request(e.to_string()))?;
        if status != 200 {
            return Err(AiError::Response { status, body: text });
        }
        Ok(text)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        let model = self.model_name(request.model);
        let body = build_request_body(request);
        let started = Instant::now();
        info!(model, image = request.has_image(), "AI request issued");

        let result = self
            .send_json(model, &body)
            .and_then(|text| parse_generate_response(&text));
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(text) => info!(model, elapsed_ms, chars = text.chars().count(), "AI request completed"),
            Err(e) => warn!(model, elapsed_ms, error = %e, "AI request failed"),
        }
        result
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: WireInlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl<'a> From<&'a Part> for WirePart<'a> {
    fn from(part: &'a Part) -> Self {
        match part {
            Part::Text(text) => WirePart::Text { text },
            Part::InlineData { mime_type, data } => WirePart::Inline {
                inline_data: WireInlineData { mime_type, data },
            },
        }
    }
}

/// JSON body of a `generateContent` call.
pub fn build_request_body(request: &GenerateRequest) -> Value {
    let generation_config =
        if request.temperature.is_some() || request.max_output_tokens.is_some() {
            Some(WireGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            })
        } else {
            None
        };

    let body = WireRequest {
        contents: vec![WireContent {
            role: Some("user"),
            parts: request.parts.iter().map(WirePart::from).collect(),
        }],
        system_instruction: request
            .system_instruction
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|text| WireContent {
                role: None,
                parts: vec![WirePart::Text { text }],
            }),
        generation_config,
    };
    serde_json::to_value(&body).unwrap_or(Value::Null)
}

/// Concatenated text parts of the first candidate.
pub fn parse_generate_response(json_text: &str) -> Result<String, AiError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| AiError::Parse(e.to_string()))?;

    let Some(candidate) = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(AiError::Parse("missing candidates[0]".to_string()));
    };

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let finish_reason = candidate.get("finishReason").and_then(Value::as_str);
        debug!(?finish_reason, "AI candidate had no text");
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{AiError, GenerateRequest, ModelKind, Part, build_request_body, parse_generate_response};
    use serde_json::json;

    #[test]
    fn body_puts_image_and_settings_in_wire_shape() {
        let req = GenerateRequest {
            model: ModelKind::Vision,
            parts: vec![Part::image("image/png", b"\x89PNG"), Part::Text("реквизиты".into())],
            system_instruction: Some("extract".into()),
            temperature: Some(0.5),
            max_output_tokens: Some(8192),
        };
        let body = build_request_body(&req);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "iVBORw==");
        assert_eq!(body["contents"][0]["parts"][1]["text"], "реквизиты");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "extract");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn plain_text_request_omits_optional_sections() {
        let body = build_request_body(&GenerateRequest::text("hi"));
        assert!(body.get("systemInstruction").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_parts_are_joined() {
        let raw = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Привет" }, { "text": ", мир" }] } }]
        })
        .to_string();
        assert_eq!(parse_generate_response(&raw).unwrap(), "Привет, мир");
    }

    #[test]
    fn empty_or_missing_candidates_are_errors() {
        let empty = json!({ "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }] });
        assert!(matches!(
            parse_generate_response(&empty.to_string()),
            Err(AiError::EmptyResponse)
        ));
        assert!(matches!(
            parse_generate_response("{}"),
            Err(AiError::Parse(_))
        ));
    }
}
