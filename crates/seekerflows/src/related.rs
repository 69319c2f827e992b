use seekercore::{FieldDescriptor, FlowDefinition, PromptTemplate, Schema};
use serde::{Deserialize, Serialize};

pub const SUGGEST_RELATED_TERMS: &str = "suggest-related-terms";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRelatedTermsInput {
    pub search_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRelatedTermsOutput {
    pub related_terms: Vec<String>,
    pub alternative_strategies: Vec<String>,
}

const PROMPT: &str = r#"You are an Open Source Intelligence (OSINT) specialist.

Starting from the search term below, suggest semantically related search terms and alternative search
strategies that widen the investigation and surface less obvious sources.

Initial Search Term: {{{searchTerm}}}

Answer in this JSON shape:
{
  "relatedTerms": ["related term 1", "related term 2"],
  "alternativeStrategies": ["strategy 1", "strategy 2"]
}"#;

pub(crate) fn definition() -> FlowDefinition {
    FlowDefinition::new(
        SUGGEST_RELATED_TERMS,
        Schema::new().with_field(
            FieldDescriptor::string("searchTerm").describe("The initial search term."),
        ),
        Schema::new()
            .with_field(
                FieldDescriptor::string_array("relatedTerms")
                    .describe("Semantically related search terms."),
            )
            .with_field(
                FieldDescriptor::string_array("alternativeStrategies")
                    .describe("Alternative search strategies."),
            ),
        PromptTemplate::new(PROMPT),
    )
    .with_description("Broaden a search term into related terms and strategies")
}
