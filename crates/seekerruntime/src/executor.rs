use crate::registry::FlowRegistry;
use seekercore::{
    parse_payload, validate, variables_from, EventBus, EventEmitter, ExecutionResult,
    FlowDefinition, ModelAdapter, SchemaViolation, SeekerError, ViolationReason,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Runs a single flow: validate input, render prompt, call the model,
/// validate the output.
///
/// Holds no per-call state, so one executor serves any number of concurrent
/// calls. Each call makes exactly one model invocation and never retries.
pub struct FlowExecutor {
    registry: Arc<FlowRegistry>,
    model: Arc<dyn ModelAdapter>,
    event_bus: Arc<EventBus>,
}

impl FlowExecutor {
    pub fn new(
        registry: Arc<FlowRegistry>,
        model: Arc<dyn ModelAdapter>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            registry,
            model,
            event_bus,
        }
    }

    pub fn registry(&self) -> &Arc<FlowRegistry> {
        &self.registry
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Execute a flow by name and return its validated output
    pub async fn execute(&self, flow: &str, input: Value) -> ExecutionResult<Value> {
        let definition = self.registry.lookup(flow)?;
        let emitter = self.event_bus.create_emitter(flow);
        let start_time = Instant::now();

        emitter.started();
        tracing::debug!(flow, execution_id = %emitter.execution_id(), "Starting flow");

        let result = self.run(&definition, input, &emitter).await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => {
                tracing::info!("Flow {} completed in {}ms", flow, duration_ms);
                emitter.completed(duration_ms);
            }
            Err(e) => {
                tracing::error!("Flow {} failed: {}", flow, e);
                emitter.failed(e.kind(), e.to_string(), duration_ms);
            }
        }

        result
    }

    /// Execute with typed input and output
    pub async fn execute_typed<I, O>(&self, flow: &str, input: &I) -> ExecutionResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input).map_err(|e| SeekerError::InvalidInput {
            flow: flow.to_string(),
            violation: SchemaViolation::new("$", ViolationReason::Unrepresentable(e.to_string())),
        })?;

        let output = self.execute(flow, input).await?;

        serde_json::from_value(output).map_err(|e| SeekerError::InvalidModelOutput {
            flow: flow.to_string(),
            violation: SchemaViolation::new("$", ViolationReason::Unrepresentable(e.to_string())),
        })
    }

    /// Render the prompt a flow would send for `input`, without calling the model
    pub fn render(&self, flow: &str, input: Value) -> ExecutionResult<String> {
        let definition = self.registry.lookup(flow)?;
        let input = check_input(&definition, input)?;
        render_prompt(&definition, &input)
    }

    async fn run(
        &self,
        definition: &FlowDefinition,
        input: Value,
        emitter: &EventEmitter,
    ) -> ExecutionResult<Value> {
        let input = check_input(definition, input)?;
        let prompt = render_prompt(definition, &input)?;

        tracing::debug!(
            flow = %definition.name,
            model = self.model.name(),
            prompt_chars = prompt.len(),
            "Invoking model"
        );
        emitter.model_invoked(self.model.name(), prompt.len());

        let payload = self
            .model
            .invoke(&prompt, &definition.output_schema)
            .await
            .map_err(|source| SeekerError::ModelCallFailed {
                flow: definition.name.clone(),
                source,
            })?;

        let raw = parse_payload(payload).map_err(|message| SeekerError::ModelResponseMalformed {
            flow: definition.name.clone(),
            message,
        })?;

        validate(&definition.output_schema, raw).map_err(|violation| {
            SeekerError::InvalidModelOutput {
                flow: definition.name.clone(),
                violation,
            }
        })
    }
}

fn check_input(definition: &FlowDefinition, input: Value) -> ExecutionResult<Value> {
    validate(&definition.input_schema, input).map_err(|violation| SeekerError::InvalidInput {
        flow: definition.name.clone(),
        violation,
    })
}

fn render_prompt(definition: &FlowDefinition, input: &Value) -> ExecutionResult<String> {
    definition
        .prompt
        .render(&variables_from(input))
        .map_err(|missing| SeekerError::MissingVariable {
            flow: definition.name.clone(),
            variable: missing.0,
        })
}
