//! Model adapter for Google's Generative Language `generateContent` API.
//!
//! The flow's output schema is forwarded as a `responseSchema` so the model
//! answers with JSON in the expected shape.

use async_trait::async_trait;
use seekercore::{FieldKind, ModelAdapter, ModelError, ModelPayload, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for [`GeminiModel`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Read `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `SEEKER_MODEL`,
    /// `SEEKER_MODEL_ENDPOINT` and `SEEKER_MODEL_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env_var("GEMINI_API_KEY").or_else(|| env_var("GOOGLE_API_KEY")),
            model: env_var("SEEKER_MODEL").unwrap_or(defaults.model),
            endpoint: env_var("SEEKER_MODEL_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout_secs: env_var("SEEKER_MODEL_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub struct GeminiModel {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Translate a [`Schema`] into Gemini's OpenAPI-subset response schema
pub fn response_schema(schema: &Schema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in schema.fields() {
        let mut property = match &field.kind {
            FieldKind::String => json!({ "type": "STRING" }),
            FieldKind::StringArray => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            FieldKind::Object(nested) => response_schema(nested),
        };
        if !field.description.is_empty() {
            property["description"] = Value::String(field.description.clone());
        }
        properties.insert(field.name.clone(), property);
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
        "propertyOrdering": schema.field_names(),
    })
}

#[async_trait]
impl ModelAdapter for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, prompt: &str, expected: &Schema) -> Result<ModelPayload, ModelError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            ModelError::NotConfigured("set GEMINI_API_KEY or GOOGLE_API_KEY".to_string())
        })?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(expected),
            },
        };

        let response = self
            .client
            .post(self.config.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        let payload = decode_response(status.as_u16(), &body)?;
        tracing::debug!(model = %self.config.model, response_bytes = body.len(), "Gemini responded");
        Ok(payload)
    }
}

/// Map a generateContent reply to the concatenated text of the first candidate.
fn decode_response(status: u16, body: &str) -> Result<ModelPayload, ModelError> {
    let parsed: Option<GenerateResponse> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .and_then(|r| r.error)
            .map(|e| e.message)
            .unwrap_or_else(|| body.to_string());
        return Err(ModelError::Status { status, message });
    }

    let parsed =
        parsed.ok_or_else(|| ModelError::Api("unreadable generateContent response".to_string()))?;
    if let Some(error) = parsed.error {
        return Err(ModelError::Api(error.message));
    }

    let text: String = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(ModelPayload::Text(text))
}

impl GeminiModel {
    fn transport_error(&self, e: reqwest::Error) -> ModelError {
        if e.is_timeout() {
            ModelError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else {
            ModelError::Transport(e.to_string())
        }
    }
}
