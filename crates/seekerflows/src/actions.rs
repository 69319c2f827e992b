//! Externally callable entry points, one per user-facing capability.
//!
//! Each action rejects blank free-text fields locally, before any flow lookup
//! or model call, and wraps every other failure with the capability it came
//! from.

use crate::pipeline::{run_analyze_then_optimize, CombinedQueryAnalysis};
use crate::related::{SuggestRelatedTermsInput, SuggestRelatedTermsOutput, SUGGEST_RELATED_TERMS};
use crate::strategic::{StrategicQueryInput, StrategicQueryOutput, STRATEGIC_QUERY_MODULES};
use seekercore::{ErrorKind, ExecutionResult, SeekerError};
use seekerruntime::FlowExecutor;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    AnalyzeAndGenerate,
    SuggestRelatedTerms,
    GenerateStrategicQueries,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AnalyzeAndGenerate => "analyze_and_generate",
            Capability::SuggestRelatedTerms => "suggest_related_terms",
            Capability::GenerateStrategicQueries => "generate_strategic_queries",
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            Capability::AnalyzeAndGenerate => {
                "Failed to perform intelligent analysis and query generation"
            }
            Capability::SuggestRelatedTerms => "Failed to suggest related terms",
            Capability::GenerateStrategicQueries => "Failed to generate strategic queries",
        }
    }
}

/// Failure of a facade call, tagged with its capability
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", describe(.capability, .error))]
pub struct ActionError {
    pub capability: Capability,
    #[source]
    pub error: SeekerError,
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

fn describe(capability: &Capability, error: &SeekerError) -> String {
    match error {
        SeekerError::EmptyInput(_) => error.to_string(),
        _ => format!("{}: {}", capability.failure_prefix(), error),
    }
}

/// Facade over the executor used by the server and the CLI
#[derive(Clone)]
pub struct SeekerActions {
    executor: Arc<FlowExecutor>,
}

impl SeekerActions {
    pub fn new(executor: Arc<FlowExecutor>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<FlowExecutor> {
        &self.executor
    }

    /// Analyse free text, then optimise the best seed query for Google and Yandex
    pub async fn analyze_and_generate(
        &self,
        user_input: &str,
    ) -> Result<CombinedQueryAnalysis, ActionError> {
        let capability = Capability::AnalyzeAndGenerate;
        require(user_input, "User input cannot be empty.").map_err(|e| wrap(capability, e))?;

        run_analyze_then_optimize(&self.executor, user_input)
            .await
            .map_err(|e| wrap(capability, e))
    }

    pub async fn suggest_related_terms(
        &self,
        search_term: &str,
    ) -> Result<SuggestRelatedTermsOutput, ActionError> {
        let capability = Capability::SuggestRelatedTerms;
        require(search_term, "Search term cannot be empty.").map_err(|e| wrap(capability, e))?;

        let input = SuggestRelatedTermsInput {
            search_term: search_term.to_string(),
        };
        self.executor
            .execute_typed(SUGGEST_RELATED_TERMS, &input)
            .await
            .map_err(|e| wrap(capability, e))
    }

    pub async fn generate_strategic_queries(
        &self,
        objective: &str,
        context: &str,
    ) -> Result<StrategicQueryOutput, ActionError> {
        let capability = Capability::GenerateStrategicQueries;
        let message = "Objective and context cannot be empty.";
        require(objective, message)
            .and_then(|_| require(context, message))
            .map_err(|e| wrap(capability, e))?;

        let input = StrategicQueryInput {
            objective: objective.to_string(),
            context: context.to_string(),
        };
        self.executor
            .execute_typed(STRATEGIC_QUERY_MODULES, &input)
            .await
            .map_err(|e| wrap(capability, e))
    }
}

fn require(value: &str, message: &str) -> ExecutionResult<()> {
    if value.trim().is_empty() {
        return Err(SeekerError::EmptyInput(message.to_string()));
    }
    Ok(())
}

fn wrap(capability: Capability, error: SeekerError) -> ActionError {
    if error.kind() != ErrorKind::EmptyInput {
        tracing::error!("{} failed: {}", capability.as_str(), error);
    }
    ActionError { capability, error }
}
