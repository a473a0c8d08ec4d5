use super::directive::AgentDirective;
use crate::model::{ModelError, ModelResponse};

/// Reads a model response as exactly one tool call or a non-empty answer.
pub(super) fn interpret(
    response: ModelResponse,
    provider: &str,
) -> Result<AgentDirective, ModelError> {
    if response.parts.is_empty() {
        return Err(ModelError::invalid_response(provider, "response has no content"));
    }

    let mut calls: Vec<_> = response.function_calls().cloned().collect();
    match calls.len() {
        0 => {}
        1 => return Ok(AgentDirective::CallTool(calls.remove(0))),
        count => {
            return Err(ModelError::invalid_response(
                provider,
                format!("expected one function call, got {count}"),
            ));
        }
    }

    let text = response.text_content();
    let text = text.trim();
    if text.is_empty() {
        return Err(ModelError::invalid_response(
            provider,
            "response has neither text nor a function call",
        ));
    }
    Ok(AgentDirective::Final {
        response: text.to_string(),
    })
}
