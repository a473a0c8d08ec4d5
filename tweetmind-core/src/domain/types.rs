use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A call proposed by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: JsonMap<String, Value>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: JsonMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn arguments(&self) -> Value {
        Value::Object(self.args.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// One part of a turn, shaped like a Gemini content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_function_response(&self) -> Option<&FunctionResponse> {
        match self {
            Part::FunctionResponse(response) => Some(response),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Model turn recording that `call` is being invoked.
    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            role: Role::Model,
            parts: vec![
                Part::Text(format!("calling tool {}", call.name)),
                Part::FunctionCall(call),
            ],
        }
    }

    /// User turn carrying the outcome of a tool call.
    pub fn function_result(name: impl Into<String>, text: impl Into<String>, is_error: bool) -> Self {
        let key = if is_error { "error" } else { "content" };
        let mut response = JsonMap::new();
        response.insert(key.to_string(), Value::String(text.into()));
        Self {
            role: Role::User,
            parts: vec![Part::FunctionResponse(FunctionResponse {
                name: name.into(),
                response: Value::Object(response),
            })],
        }
    }

    pub fn function_call_part(&self) -> Option<&FunctionCall> {
        self.parts.iter().find_map(Part::as_function_call)
    }

    pub fn function_response_part(&self) -> Option<&FunctionResponse> {
        self.parts.iter().find_map(Part::as_function_response)
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Ordered, append-only turn history replayed to the model on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// True when every function-call turn is immediately followed by a
    /// user turn carrying the response for the same tool.
    pub fn is_resolved(&self) -> bool {
        self.turns.iter().enumerate().all(|(index, turn)| {
            let Some(call) = turn.function_call_part() else {
                return true;
            };
            self.turns
                .get(index + 1)
                .filter(|next| next.role == Role::User)
                .and_then(Turn::function_response_part)
                .is_some_and(|response| response.name == call.name)
        })
    }
}
