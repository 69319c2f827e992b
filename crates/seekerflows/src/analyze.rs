use seekercore::{FieldDescriptor, FlowDefinition, PromptTemplate, Schema};
use serde::{Deserialize, Serialize};

pub const ANALYZE_INPUT: &str = "analyze-input";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeUserInputInput {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeUserInputOutput {
    pub entities: Vec<String>,
    pub concepts: Vec<String>,
    pub information_needs: String,
    pub query_suggestions: Vec<String>,
}

const PROMPT: &str = r#"You are an analyst who breaks a request down into the entities, concepts and information needs behind it.

Read the user input below. It may be a natural-language question, a URL or a fragment of structured data.
List the key entities and key concepts it mentions, summarise what the user is trying to find out, and
propose search queries that would help them find it.

User Input: {{{input}}}

Answer with a JSON object only."#;

pub(crate) fn definition() -> FlowDefinition {
    FlowDefinition::new(
        ANALYZE_INPUT,
        Schema::new().with_field(
            FieldDescriptor::string("input")
                .describe("Natural-language query, URL or structured data supplied by the user."),
        ),
        Schema::new()
            .with_field(
                FieldDescriptor::string_array("entities")
                    .describe("Key entities identified in the input."),
            )
            .with_field(
                FieldDescriptor::string_array("concepts")
                    .describe("Key concepts identified in the input."),
            )
            .with_field(
                FieldDescriptor::string("informationNeeds")
                    .describe("What the user is trying to find out."),
            )
            .with_field(
                FieldDescriptor::string_array("querySuggestions")
                    .describe("Search queries suggested by the analysis."),
            ),
        PromptTemplate::new(PROMPT),
    )
    .with_description("Extract entities, concepts and information needs from free text")
}
