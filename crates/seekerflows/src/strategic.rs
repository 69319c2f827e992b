use seekercore::{FieldDescriptor, FlowDefinition, PromptTemplate, Schema};
use serde::{Deserialize, Serialize};

pub const STRATEGIC_QUERY_MODULES: &str = "strategic-query-modules";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicQueryInput {
    pub objective: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicQueryOutput {
    pub queries: Vec<String>,
}

const PROMPT: &str = r#"You are an Open Source Intelligence (OSINT) and search specialist. Build a set of search queries aimed at
one investigation objective, using the keywords and operators that fit it.

Objective: {{{objective}}}
Context: {{{context}}}

Cover several engines (Google, Yandex) and verticals (web, images, news, files) and include dorks where
they help. Every query should be specific and likely to return useful results.

Answer with a JSON object whose "queries" field is an array of strings."#;

pub(crate) fn definition() -> FlowDefinition {
    FlowDefinition::new(
        STRATEGIC_QUERY_MODULES,
        Schema::new()
            .with_field(FieldDescriptor::string("objective").describe(
                "The OSINT objective, e.g. digital footprint mapping or vulnerability probing.",
            ))
            .with_field(
                FieldDescriptor::string("context")
                    .describe("Keywords or background for the investigation."),
            ),
        Schema::new().with_field(
            FieldDescriptor::string_array("queries").describe("Generated search queries."),
        ),
        PromptTemplate::new(PROMPT),
    )
    .with_description("Generate a query set for a specific OSINT objective")
}
