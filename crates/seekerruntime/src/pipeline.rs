use crate::executor::FlowExecutor;
use seekercore::{ExecutionResult, SeekerError};
use serde_json::{Map, Value};

/// Value used when none of a step's candidate fields yields a seed
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    Literal(String),
    /// Named string field of the pipeline's initial input
    PipelineInput(String),
}

/// Picks which upstream output field seeds the next flow
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStep {
    pub source_flow: String,
    pub field_selection_order: Vec<String>,
    pub fallback: Fallback,
}

impl PipelineStep {
    pub fn new(source_flow: impl Into<String>) -> Self {
        Self {
            source_flow: source_flow.into(),
            field_selection_order: Vec::new(),
            fallback: Fallback::Literal(String::new()),
        }
    }

    /// Append a candidate field; earlier candidates win
    pub fn select(mut self, field: impl Into<String>) -> Self {
        self.field_selection_order.push(field.into());
        self
    }

    pub fn or_else(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// First candidate that yields a non-empty string, else the fallback.
    ///
    /// A string field counts when non-empty; an array field counts when its
    /// first element is a non-empty string.
    pub fn select_seed(&self, source_output: &Value, pipeline_input: &Value) -> String {
        self.field_selection_order
            .iter()
            .find_map(|field| source_output.get(field).and_then(candidate))
            .map(str::to_string)
            .unwrap_or_else(|| match &self.fallback {
                Fallback::Literal(value) => value.clone(),
                Fallback::PipelineInput(field) => pipeline_input
                    .get(field)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
    }
}

fn candidate(value: &Value) -> Option<&str> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Feeds a seed selected from an earlier stage into the `target_field` of
/// the next flow
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineLink {
    pub step: PipelineStep,
    pub target_flow: String,
    pub target_field: String,
}

impl PipelineLink {
    pub fn new(
        step: PipelineStep,
        target_flow: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            step,
            target_flow: target_flow.into(),
            target_field: target_field.into(),
        }
    }
}

/// Output of one pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub flow: String,
    /// Seed that produced this stage's input; `None` for the first stage
    pub seed: Option<String>,
    pub output: Value,
}

/// Chain of flows where each link draws its input from an earlier stage
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    first_flow: String,
    links: Vec<PipelineLink>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, first_flow: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first_flow: first_flow.into(),
            links: Vec::new(),
        }
    }

    pub fn then(mut self, link: PipelineLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flows(&self) -> Vec<&str> {
        std::iter::once(self.first_flow.as_str())
            .chain(self.links.iter().map(|l| l.target_flow.as_str()))
            .collect()
    }

    /// Run every stage in order.
    ///
    /// The first failing stage ends the pipeline with its error; outputs of
    /// stages that already completed are dropped.
    pub async fn run(
        &self,
        executor: &FlowExecutor,
        input: Value,
    ) -> ExecutionResult<Vec<StageOutput>> {
        let mut stages = Vec::with_capacity(self.links.len() + 1);

        let output = executor.execute(&self.first_flow, input.clone()).await?;
        stages.push(StageOutput {
            flow: self.first_flow.clone(),
            seed: None,
            output,
        });

        for link in &self.links {
            let source = stages
                .iter()
                .rev()
                .find(|stage| stage.flow == link.step.source_flow)
                .ok_or_else(|| SeekerError::UnknownFlow(link.step.source_flow.clone()))?;

            let seed = link.step.select_seed(&source.output, &input);
            tracing::debug!(
                pipeline = %self.name,
                from = %link.step.source_flow,
                to = %link.target_flow,
                seed = %seed,
                "Selected pipeline seed"
            );

            let mut next_input = Map::new();
            next_input.insert(link.target_field.clone(), Value::String(seed.clone()));

            let output = executor
                .execute(&link.target_flow, Value::Object(next_input))
                .await?;
            stages.push(StageOutput {
                flow: link.target_flow.clone(),
                seed: Some(seed),
                output,
            });
        }

        Ok(stages)
    }
}
