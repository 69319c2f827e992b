//! User-readable messages for facade failures.

use crate::actions::{ActionError, Capability};
use seekercore::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cause {
    Network,
    Input,
    Model,
    Other,
}

fn cause(kind: ErrorKind) -> Cause {
    match kind {
        ErrorKind::ModelCallFailed => Cause::Network,
        ErrorKind::EmptyInput | ErrorKind::InvalidInput => Cause::Input,
        ErrorKind::ModelResponseMalformed | ErrorKind::InvalidModelOutput => Cause::Model,
        ErrorKind::UnknownFlow | ErrorKind::DuplicateFlow | ErrorKind::MissingVariable => {
            Cause::Other
        }
    }
}

/// Short title for an error banner
pub fn title(capability: Capability) -> &'static str {
    match capability {
        Capability::AnalyzeAndGenerate => "Analysis Failed",
        Capability::SuggestRelatedTerms => "Suggestion Failed",
        Capability::GenerateStrategicQueries => "Query Generation Failed",
    }
}

/// Map a facade failure to a sentence suitable for a toast or alert
pub fn friendly_message(error: &ActionError) -> &'static str {
    match (error.capability, cause(error.kind())) {
        (Capability::AnalyzeAndGenerate, Cause::Network) => {
            "Analysis failed due to a network issue. Please check your connection and try again."
        }
        (Capability::AnalyzeAndGenerate, Cause::Input) => {
            "Analysis failed due to invalid input. Please check your query and try again."
        }
        (Capability::AnalyzeAndGenerate, _) => "An unexpected error occurred. Please try again.",

        (Capability::SuggestRelatedTerms, Cause::Network) => {
            "Could not suggest terms due to a network issue. Please check your connection."
        }
        (Capability::SuggestRelatedTerms, Cause::Input) => "Please enter a search term.",
        (Capability::SuggestRelatedTerms, Cause::Model) => {
            "The AI could not find related terms for your input. Please try a different term."
        }
        (Capability::SuggestRelatedTerms, Cause::Other) => {
            "An unexpected error occurred while suggesting terms. Please try again."
        }

        (Capability::GenerateStrategicQueries, Cause::Network) => {
            "Could not generate queries due to a network issue. Please check your connection."
        }
        (Capability::GenerateStrategicQueries, Cause::Input) => {
            "Query generation failed. Please check your objective and context."
        }
        (Capability::GenerateStrategicQueries, Cause::Model) => {
            "The AI could not generate strategic queries for your input. Please try adjusting the objective or context."
        }
        (Capability::GenerateStrategicQueries, Cause::Other) => {
            "An unexpected error occurred while generating strategic queries. Please try again."
        }
    }
}
