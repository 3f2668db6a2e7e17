//! Generation request value object

use super::model::ModelId;
use crate::schema::OutputShape;
use crate::tool::{ToolCall, ToolDescriptor, TranscriptEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One call's worth of input to a generation provider.
///
/// Requests are never mutated once handed to a provider; each resolution
/// round builds an [`augmented`](GenerationRequest::augmented) copy carrying
/// the transcript so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Fully rendered prompt text
    pub prompt: String,
    /// Declared output shape; `None` means free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_shape: Option<OutputShape>,
    /// Tools the model may call for this request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDescriptor>,
    /// Model override; the provider's default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,
    /// Prior tool rounds, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript: Vec<TranscriptEntry>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            output_shape: None,
            tools: Vec::new(),
            model: None,
            transcript: Vec::new(),
        }
    }

    pub fn with_output_shape(mut self, shape: OutputShape) -> Self {
        self.output_shape = Some(shape);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = Some(model);
        self
    }

    /// Copy of this request with one more completed tool round
    pub fn augmented(&self, call: &ToolCall, output: Value) -> Self {
        let mut next = self.clone();
        next.transcript.push(TranscriptEntry::new(call, output));
        next
    }

    /// Copy of this request carrying exactly the given transcript
    pub fn with_transcript(&self, transcript: Vec<TranscriptEntry>) -> Self {
        let mut next = self.clone();
        next.transcript = transcript;
        next
    }

    pub fn offers_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    pub fn is_structured(&self) -> bool {
        self.output_shape.is_some()
    }

    /// Prompt text with the transcript appended.
    ///
    /// Used by providers without native function calling so the model
    /// still sees prior tool results.
    pub fn rendered_prompt(&self) -> String {
        if self.transcript.is_empty() {
            return self.prompt.clone();
        }

        let mut rendered = self.prompt.clone();
        rendered.push_str("\n\n## Tool results\n");
        for entry in &self.transcript {
            rendered.push_str(&format!(
                "\n### {}({})\n{}\n",
                entry.tool_name, entry.input, entry.output
            ));
        }
        rendered
    }
}
