use crate::analyze::{AnalyzeUserInputOutput, ANALYZE_INPUT};
use crate::optimize::{GenerateOptimizedQueriesOutput, GENERATE_OPTIMIZED_QUERIES};
use seekercore::{ExecutionResult, SchemaViolation, SeekerError, ViolationReason};
use seekerruntime::{Fallback, FlowExecutor, Pipeline, PipelineLink, PipelineStep, StageOutput};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Result of analysing free text and optimising the chosen seed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedQueryAnalysis {
    pub analysis: AnalyzeUserInputOutput,
    pub optimized_queries: GenerateOptimizedQueriesOutput,
    /// Query handed to the optimisation flow
    pub seed_query: String,
}

/// `analyze-input` followed by `generate-optimized-queries`.
///
/// The seed is the first query suggestion, else the information needs, else
/// the user's own input.
pub fn analyze_then_optimize() -> Pipeline {
    let step = PipelineStep::new(ANALYZE_INPUT)
        .select("querySuggestions")
        .select("informationNeeds")
        .or_else(Fallback::PipelineInput("input".to_string()));

    Pipeline::new("analyze-then-optimize", ANALYZE_INPUT).then(PipelineLink::new(
        step,
        GENERATE_OPTIMIZED_QUERIES,
        "query",
    ))
}

pub async fn run_analyze_then_optimize(
    executor: &FlowExecutor,
    user_input: &str,
) -> ExecutionResult<CombinedQueryAnalysis> {
    let stages = analyze_then_optimize()
        .run(executor, json!({ "input": user_input }))
        .await?;

    let mut stages = stages.into_iter();
    let analysis = stages
        .next()
        .ok_or_else(|| SeekerError::UnknownFlow(ANALYZE_INPUT.to_string()))?;
    let optimized = stages
        .next()
        .ok_or_else(|| SeekerError::UnknownFlow(GENERATE_OPTIMIZED_QUERIES.to_string()))?;

    let seed_query = optimized.seed.clone().unwrap_or_default();
    Ok(CombinedQueryAnalysis {
        analysis: decode(analysis)?,
        optimized_queries: decode(optimized)?,
        seed_query,
    })
}

fn decode<T: DeserializeOwned>(stage: StageOutput) -> ExecutionResult<T> {
    serde_json::from_value(stage.output).map_err(|e| SeekerError::InvalidModelOutput {
        flow: stage.flow,
        violation: SchemaViolation::new("$", ViolationReason::Unrepresentable(e.to_string())),
    })
}
