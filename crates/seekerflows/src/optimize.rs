use seekercore::{FieldDescriptor, FlowDefinition, PromptTemplate, Schema};
use serde::{Deserialize, Serialize};

pub const GENERATE_OPTIMIZED_QUERIES: &str = "generate-optimized-queries";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptimizedQueriesInput {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptimizedQueriesOutput {
    pub google_queries: Vec<String>,
    pub yandex_queries: Vec<String>,
}

const PROMPT: &str = r#"You write advanced search-engine queries (dorks).

Turn the query below into optimised queries for Google and for Yandex. Use each engine's own operators
and syntax, and target its verticals where useful (Google Images, News and Scholar; Yandex.Images,
Yandex.Maps and Yandex.Public).

User Query: {{{query}}}

Answer with a JSON object holding two arrays of strings:
- googleQueries: queries for Google
- yandexQueries: queries for Yandex"#;

pub(crate) fn definition() -> FlowDefinition {
    FlowDefinition::new(
        GENERATE_OPTIMIZED_QUERIES,
        Schema::new()
            .with_field(FieldDescriptor::string("query").describe("The search query to optimise.")),
        Schema::new()
            .with_field(
                FieldDescriptor::string_array("googleQueries")
                    .describe("Optimised search queries for Google."),
            )
            .with_field(
                FieldDescriptor::string_array("yandexQueries")
                    .describe("Optimised search queries for Yandex."),
            ),
        PromptTemplate::new(PROMPT),
    )
    .with_description("Rewrite a query into Google and Yandex dorks")
}
