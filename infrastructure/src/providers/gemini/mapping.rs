//! Mapping between genflow requests/results and Gemini wire types

use super::protocol::{
    Content, FunctionCallingConfig, FunctionDeclaration, GeminiTool, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part, ToolConfig, is_blocked_finish_reason,
};
use genflow_application::ProviderError;
use genflow_domain::{GenerationRequest, GenerationResult, OutputShape, ToolCall, ToolDescriptor};
use serde_json::{Value, json};

/// Build the `generateContent` body for a genflow request.
///
/// Completed tool rounds are replayed as native function call/response
/// turns rather than folded into the prompt text.
pub(crate) fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
    let mut prompt = request.prompt.clone();
    if let Some(shape) = &request.output_shape {
        prompt.push_str(&output_instructions(shape));
    }

    let mut contents = vec![Content::user(vec![Part::text(prompt)])];
    for entry in &request.transcript {
        contents.push(Content::model(vec![Part::function_call(
            &entry.tool_name,
            entry.input.clone(),
        )]));
        contents.push(Content::user(vec![Part::function_response(
            &entry.tool_name,
            wrap_tool_output(&entry.output),
        )]));
    }

    // JSON mode cannot be combined with function calling
    let generation_config = match &request.output_shape {
        Some(shape) if request.tools.is_empty() => Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_json_schema: Some(shape.to_json_schema()),
            ..Default::default()
        }),
        _ => None,
    };

    GenerateContentRequest {
        contents,
        tools: map_tools(&request.tools),
        tool_config: tool_config(&request.tools),
        generation_config,
    }
}

fn output_instructions(shape: &OutputShape) -> String {
    format!(
        "\n\nOutput should be in JSON format and conform to the following schema:\n\n```\n{}\n```\n",
        shape.to_json_schema()
    )
}

fn map_tools(tools: &[ToolDescriptor]) -> Option<Vec<GeminiTool>> {
    if tools.is_empty() {
        return None;
    }
    Some(vec![GeminiTool {
        function_declarations: tools
            .iter()
            .map(|tool| FunctionDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters_json_schema: tool.input_shape.to_json_schema(),
            })
            .collect(),
    }])
}

fn tool_config(tools: &[ToolDescriptor]) -> Option<ToolConfig> {
    if tools.is_empty() {
        return None;
    }
    Some(ToolConfig {
        function_calling_config: FunctionCallingConfig {
            mode: "AUTO".to_string(),
            allowed_function_names: tools.iter().map(|tool| tool.name.clone()).collect(),
        },
    })
}

/// Function responses must be JSON objects
pub(crate) fn wrap_tool_output(output: &Value) -> Value {
    if output.is_object() {
        output.clone()
    } else {
        json!({ "output": output })
    }
}

pub(crate) fn tool_call_from(name: String, args: Value) -> ToolCall {
    let input = match args {
        Value::Null => json!({}),
        Value::Object(_) => args,
        other => json!({ "value": other }),
    };
    ToolCall::new(name).with_input(input)
}

/// Parse model text as JSON, tolerating a Markdown code fence.
///
/// Unparseable text is returned as a JSON string so that schema validation
/// reports the mismatch.
pub(crate) fn parse_structured_text(text: &str) -> Value {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Turn a `generateContent` response into a generation result
pub(crate) fn interpret_response(
    response: GenerateContentResponse,
    structured: bool,
) -> Result<GenerationResult, ProviderError> {
    let block_reason = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone());

    let Some(candidate) = response.into_first_candidate() else {
        return Err(match block_reason {
            Some(reason) => ProviderError::Rejected(format!("Prompt blocked: {}", reason)),
            None => ProviderError::Unavailable("No candidates in response".to_string()),
        });
    };

    let finish_reason = candidate.finish_reason;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    if let Some(call) = parts.iter().find_map(|part| part.function_call.clone()) {
        return Ok(GenerationResult::tool_call(tool_call_from(call.name, call.args)));
    }

    let text: String = parts.into_iter().filter_map(|part| part.text).collect();

    if text.is_empty()
        && let Some(reason) = finish_reason.filter(|r| is_blocked_finish_reason(r))
    {
        return Err(ProviderError::Rejected(format!("Generation blocked: {}", reason)));
    }

    if structured {
        Ok(GenerationResult::final_value(parse_structured_text(&text)))
    } else {
        Ok(GenerationResult::text(text))
    }
}
