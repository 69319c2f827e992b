use crate::{PromptTemplate, Schema};

/// Complete flow definition: what goes in, what the model must return, and
/// the prompt that connects them
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDefinition {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Schema,
    pub output_schema: Schema,
    pub prompt: PromptTemplate,
}

impl FlowDefinition {
    pub fn new(
        name: impl Into<String>,
        input_schema: Schema,
        output_schema: Schema,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema,
            output_schema,
            prompt,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
