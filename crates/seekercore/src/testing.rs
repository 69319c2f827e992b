//! Testing utilities: a model adapter with scripted responses.
//!
//! ```ignore
//! let model = ScriptedModel::new()
//!     .respond_with(json!({"queries": ["site:example.com"]}))
//!     .fail_with(ModelError::Timeout { seconds: 30 });
//! ```

use crate::{ModelAdapter, ModelError, ModelPayload, Schema};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ModelPayload, ModelError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, payload: impl Into<ModelPayload>) -> Self {
        self.push(Ok(payload.into()));
        self
    }

    pub fn fail_with(self, error: ModelError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, response: Result<ModelPayload, ModelError>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Number of invocations so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ModelAdapter for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, prompt: &str, _expected: &Schema) -> Result<ModelPayload, ModelError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Api("no scripted response left".to_string())))
    }
}
