use crate::{ModelError, Schema};
use async_trait::async_trait;
use serde_json::Value;

/// What a model adapter hands back for a single prompt
#[derive(Debug, Clone, PartialEq)]
pub enum ModelPayload {
    /// Adapter already decoded the response
    Structured(Value),
    /// Raw completion text, parsed by the executor
    Text(String),
}

impl From<Value> for ModelPayload {
    fn from(value: Value) -> Self {
        ModelPayload::Structured(value)
    }
}

impl From<String> for ModelPayload {
    fn from(text: String) -> Self {
        ModelPayload::Text(text)
    }
}

impl From<&str> for ModelPayload {
    fn from(text: &str) -> Self {
        ModelPayload::Text(text.to_string())
    }
}

/// The one external collaborator of the pipeline: performs the model call
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Identifier for logs (e.g. "gemini-2.0-flash")
    fn name(&self) -> &str;

    /// Send `prompt` and return the model's answer.
    ///
    /// `expected` is the shape the caller will validate against; adapters may
    /// forward it to the model as a response schema.
    async fn invoke(&self, prompt: &str, expected: &Schema) -> Result<ModelPayload, ModelError>;
}

/// Interpret a payload as structured JSON.
///
/// Raw text may be bare JSON, a fenced code block, or prose wrapping a single
/// top-level object.
pub fn parse_payload(payload: ModelPayload) -> Result<Value, String> {
    let text = match payload {
        ModelPayload::Structured(value) => return Ok(value),
        ModelPayload::Text(text) => text,
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty response".to_string());
    }

    let first_error = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    if let Some(block) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(first_error)
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    let body_start = after.find('\n')? + 1;
    let body = &after[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}
