use serde_json::Value;

/// One prompt for the model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier, e.g. `gemini-3-pro-preview`.
    pub model: String,
    /// The user turn.
    pub contents: String,
    /// Standing instructions that frame how `contents` is answered.
    pub system_instruction: Option<String>,
    /// JSON schema (OpenAPI subset) the answer must conform to. Implies a
    /// JSON response.
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: contents.into(),
            system_instruction: None,
            response_schema: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Whether the answer is requested as JSON.
    pub fn expects_json(&self) -> bool {
        self.response_schema.is_some()
    }
}
