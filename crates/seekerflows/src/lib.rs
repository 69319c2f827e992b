//! OSINT flow library
//!
//! The four prompt flows behind Seeker Lens, the analyze-then-optimize
//! pipeline, the action facade the outer surfaces call, and the Gemini model
//! adapter.

pub mod actions;
mod analyze;
pub mod export;
mod gemini;
mod optimize;
mod pipeline;
pub mod presentation;
mod related;
mod strategic;

pub use actions::{ActionError, Capability, SeekerActions};
pub use analyze::{AnalyzeUserInputInput, AnalyzeUserInputOutput, ANALYZE_INPUT};
pub use gemini::{response_schema, GeminiConfig, GeminiModel, DEFAULT_MODEL};
pub use optimize::{
    GenerateOptimizedQueriesInput, GenerateOptimizedQueriesOutput, GENERATE_OPTIMIZED_QUERIES,
};
pub use pipeline::{analyze_then_optimize, run_analyze_then_optimize, CombinedQueryAnalysis};
pub use related::{SuggestRelatedTermsInput, SuggestRelatedTermsOutput, SUGGEST_RELATED_TERMS};
pub use strategic::{StrategicQueryInput, StrategicQueryOutput, STRATEGIC_QUERY_MODULES};

use seekercore::ExecutionResult;
use seekerruntime::FlowRegistry;

/// Objectives offered by the strategic query module. Advisory only; any
/// non-blank objective is accepted.
pub const OSINT_OBJECTIVES: &[&str] = &[
    "Digital Footprint Mapping",
    "Vulnerability Probing (Ethical Dorking)",
    "Metadata Discovery",
    "Archival & Historical Search",
    "Social Media Intelligence (SOCMINT)",
    "Supply Chain Analysis",
    "Reputation Monitoring",
];

/// Register every standard flow, in a fixed order
pub fn register_all_flows(registry: &mut FlowRegistry) -> ExecutionResult<()> {
    registry.register(analyze::definition())?;
    registry.register(optimize::definition())?;
    registry.register(related::definition())?;
    registry.register(strategic::definition())?;
    Ok(())
}
