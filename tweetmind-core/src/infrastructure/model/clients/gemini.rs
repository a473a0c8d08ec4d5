//! Gemini client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::domain::tool::{ParameterShape, ToolDeclaration};
use crate::domain::types::{FunctionCall, Part, Turn};
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

const PROVIDER_ID: &str = "gemini";

/// Gemini `generateContent` client with function calling
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base: HttpClientBase::new(PROVIDER_ID.to_string(), endpoint.into(), api_key),
            api_path: DEFAULT_GEMINI_API_PATH.to_string(),
        }
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    fn build_model_url(&self, model: &str) -> String {
        let path = format!("{}/{model}:generateContent", self.api_path.trim_matches('/'));
        self.base.build_url(&path)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Turn],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool<'a> {
    function_declarations: Vec<FunctionDeclaration<'a>>,
}

/// Gemini rejects an object schema without properties, so tools that take
/// no arguments omit `parameters` entirely.
#[derive(Serialize)]
struct FunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a ParameterShape>,
}

impl<'a> From<&'a ToolDeclaration> for FunctionDeclaration<'a> {
    fn from(declaration: &'a ToolDeclaration) -> Self {
        Self {
            name: &declaration.name,
            description: &declaration.description,
            parameters: (!declaration.parameters.properties.is_empty())
                .then_some(&declaration.parameters),
        }
    }
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

fn build_payload(request: &ModelRequest) -> GenerateContentRequest<'_> {
    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTool {
            function_declarations: request.tools.iter().map(FunctionDeclaration::from).collect(),
        }]
    };
    GenerateContentRequest {
        contents: &request.contents,
        tools,
        system_instruction: request
            .system_instruction
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(|text| SystemInstruction {
                parts: [TextPart { text }],
            }),
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.build_model_url(&request.model);
        let payload = build_payload(&request);

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            turns = request.contents.len(),
            tools = request.tools.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_with_query_key(&url, &payload).await?;
        let parts = response.into_parts();
        debug!(parts = parts.len(), "Received response from Gemini");
        Ok(ModelResponse::new(parts))
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Option<JsonMap<String, Value>>,
}

impl GeminiResponse {
    /// Parts of the first candidate only; parts of unknown kinds are skipped.
    fn into_parts(self) -> Vec<Part> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| match (part.function_call, part.text) {
                        (Some(call), _) => Some(Part::FunctionCall(FunctionCall::new(
                            call.name,
                            call.args.unwrap_or_default(),
                        ))),
                        (None, Some(text)) => Some(Part::Text(text)),
                        (None, None) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
