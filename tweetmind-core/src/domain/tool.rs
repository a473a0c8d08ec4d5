use super::schema::{Parameters, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("tool '{name}' declares a non-object input schema ({found})")]
pub struct DescriptorError {
    pub name: String,
    pub found: &'static str,
}

/// Declared name, description and parameter schema of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct ToolDescriptor {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Schema,
}

#[derive(Deserialize)]
struct RawDescriptor {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "inputSchema")]
    input_schema: Option<Schema>,
}

impl TryFrom<RawDescriptor> for ToolDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        let input_schema = raw
            .input_schema
            .unwrap_or_else(|| Parameters::new().into_schema());
        if !input_schema.is_object() {
            return Err(DescriptorError {
                name: raw.name,
                found: input_schema.type_name(),
            });
        }
        Ok(Self {
            name: raw.name,
            description: raw.description.unwrap_or_default(),
            input_schema,
        })
    }
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: parameters.into_schema(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }
}

/// A tool in the function-calling shape the model expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: ParameterShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterShape {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, Schema>,
    pub required: Vec<String>,
}

impl From<&ToolDescriptor> for ToolDeclaration {
    fn from(descriptor: &ToolDescriptor) -> Self {
        let (properties, required) = match &descriptor.input_schema {
            Schema::Object {
                properties,
                required,
                ..
            } => (properties.clone(), required.clone()),
            _ => (BTreeMap::new(), Vec::new()),
        };
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters: ParameterShape {
                kind: "object".to_string(),
                properties,
                required,
            },
        }
    }
}

/// Project descriptors into declarations, keeping discovery order.
pub fn declarations(descriptors: &[ToolDescriptor]) -> Vec<ToolDeclaration> {
    descriptors.iter().map(ToolDeclaration::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// Normalized outcome of a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// All text blocks joined by newlines.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                Content::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
