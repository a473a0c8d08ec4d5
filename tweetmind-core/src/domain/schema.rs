//! Parameter schemas for tool descriptors.
//!
//! A [`Schema`] is a closed set of JSON Schema shapes. Object properties are
//! kept in a `BTreeMap` so the serialized form does not depend on the order
//! in which fields were declared.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Array {
        items: Box<Schema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Object {
        #[serde(default)]
        properties: BTreeMap<String, Schema>,
        #[serde(default)]
        required: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("arguments must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
    #[error("missing required field '{field}'")]
    MissingField { field: String },
    #[error("field '{field}' must be {expected}, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl Schema {
    pub fn string() -> Self {
        Schema::String { description: None }
    }

    pub fn number() -> Self {
        Schema::Number { description: None }
    }

    pub fn integer() -> Self {
        Schema::Integer { description: None }
    }

    pub fn boolean() -> Self {
        Schema::Boolean { description: None }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
            description: None,
        }
    }

    pub fn described(mut self, text: impl Into<String>) -> Self {
        let slot = match &mut self {
            Schema::String { description }
            | Schema::Number { description }
            | Schema::Integer { description }
            | Schema::Boolean { description }
            | Schema::Array { description, .. }
            | Schema::Object { description, .. } => description,
        };
        *slot = Some(text.into());
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String { .. } => "string",
            Schema::Number { .. } => "number",
            Schema::Integer { .. } => "integer",
            Schema::Boolean { .. } => "boolean",
            Schema::Array { .. } => "array",
            Schema::Object { .. } => "object",
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Schema::Object { .. })
    }

    /// Structurally check `value` against this schema.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(value, "")
    }

    fn check(&self, value: &Value, path: &str) -> Result<(), ValidationError> {
        match self {
            Schema::String { .. } => self.expect(value.is_string(), value, path),
            Schema::Number { .. } => self.expect(value.is_number(), value, path),
            Schema::Integer { .. } => self.expect(is_integral(value), value, path),
            Schema::Boolean { .. } => self.expect(value.is_boolean(), value, path),
            Schema::Array { items, .. } => {
                let Some(elements) = value.as_array() else {
                    return self.expect(false, value, path);
                };
                for (index, element) in elements.iter().enumerate() {
                    items.check(element, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            Schema::Object {
                properties,
                required,
                ..
            } => {
                let Some(fields) = value.as_object() else {
                    if path.is_empty() {
                        return Err(ValidationError::NotAnObject {
                            found: json_type(value),
                        });
                    }
                    return self.expect(false, value, path);
                };

                for name in required {
                    if fields.get(name).is_none_or(Value::is_null) {
                        return Err(ValidationError::MissingField {
                            field: join_path(path, name),
                        });
                    }
                }

                for (name, schema) in properties {
                    match fields.get(name) {
                        None | Some(Value::Null) => continue,
                        Some(field) => schema.check(field, &join_path(path, name))?,
                    }
                }
                Ok(())
            }
        }
    }

    fn expect(&self, ok: bool, value: &Value, path: &str) -> Result<(), ValidationError> {
        if ok {
            return Ok(());
        }
        Err(ValidationError::WrongType {
            field: path.to_string(),
            expected: self.type_name(),
            found: json_type(value),
        })
    }
}

/// Builder for the top-level object schema of a tool.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    properties: BTreeMap<String, Schema>,
    required: Vec<String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if !self.required.contains(&name) {
            self.required.push(name);
            self.required.sort();
        }
        self
    }

    pub fn optional(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.retain(|existing| existing != &name);
        self.properties.insert(name, schema);
        self
    }

    pub fn into_schema(self) -> Schema {
        Schema::Object {
            properties: self.properties,
            required: self.required,
            description: None,
        }
    }
}

fn is_integral(value: &Value) -> bool {
    value.is_i64()
        || value.is_u64()
        || value
            .as_f64()
            .is_some_and(|number| number.is_finite() && number.fract() == 0.0)
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sum_schema() -> Schema {
        Parameters::new()
            .required("a", Schema::number())
            .required("b", Schema::number())
            .optional("note", Schema::string().described("free text"))
            .into_schema()
    }

    #[test]
    fn serializes_as_json_schema() {
        let value = serde_json::to_value(sum_schema()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "number"},
                    "b": {"type": "number"},
                    "note": {"type": "string", "description": "free text"}
                },
                "required": ["a", "b"]
            })
        );
    }

    #[test]
    fn parses_foreign_schema_with_extra_keys() {
        let raw = json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "count": {"type": "integer"}
            },
            "required": ["tags"],
            "additionalProperties": false,
            "$schema": "http://json-schema.org/draft-07/schema#"
        });
        let schema: Schema = serde_json::from_value(raw).expect("parse schema");
        assert!(schema.validate(&json!({"tags": ["x"], "count": 2})).is_ok());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = sum_schema().validate(&json!({"a": 1})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "b".to_string()
            }
        );

        let err = sum_schema()
            .validate(&json!({"a": 1, "b": null}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[test]
    fn wrong_type_names_the_path() {
        let err = sum_schema()
            .validate(&json!({"a": "three", "b": 4}))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                field: "a".to_string(),
                expected: "number",
                found: "string",
            }
        );

        let nested = Parameters::new()
            .required("tags", Schema::array(Schema::string()))
            .into_schema();
        let err = nested.validate(&json!({"tags": ["ok", 3]})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                field: "tags[1]".to_string(),
                expected: "string",
                found: "number",
            }
        );
    }

    #[test]
    fn top_level_must_be_an_object() {
        let err = sum_schema().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject { found: "array" });
    }

    #[test]
    fn integers_accept_whole_floats_only() {
        let schema = Parameters::new()
            .required("n", Schema::integer())
            .into_schema();
        assert!(schema.validate(&json!({"n": 4})).is_ok());
        assert!(schema.validate(&json!({"n": 4.0})).is_ok());
        assert!(schema.validate(&json!({"n": 4.5})).is_err());
    }

    #[test]
    fn declaration_order_does_not_change_output() {
        let forward = Parameters::new()
            .required("a", Schema::number())
            .required("b", Schema::string())
            .into_schema();
        let backward = Parameters::new()
            .required("b", Schema::string())
            .required("a", Schema::number())
            .into_schema();
        assert_eq!(
            serde_json::to_string(&forward).expect("serialize"),
            serde_json::to_string(&backward).expect("serialize")
        );
    }
}
