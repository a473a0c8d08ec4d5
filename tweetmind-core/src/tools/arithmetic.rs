use crate::application::registry::{ToolHandler, UpstreamError};
use crate::domain::schema::{Parameters, Schema};
use crate::domain::tool::{ToolDescriptor, ToolResult};
use async_trait::async_trait;
use serde_json::Value;

pub const ADD_TWO_NUMBERS: &str = "addTwoNumbers";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        ADD_TWO_NUMBERS,
        "Add two numbers",
        Parameters::new()
            .required("a", Schema::number().described("First number"))
            .required("b", Schema::number().described("Second number")),
    )
}

pub struct AddTwoNumbers;

#[async_trait]
impl ToolHandler for AddTwoNumbers {
    async fn call(&self, arguments: Value) -> Result<ToolResult, UpstreamError> {
        let a = number(&arguments, "a")?;
        let b = number(&arguments, "b")?;
        Ok(ToolResult::text(format!(
            "The sum of {} and {} is {}",
            format_number(a),
            format_number(b),
            format_number(a + b)
        )))
    }
}

fn number(arguments: &Value, field: &str) -> Result<f64, UpstreamError> {
    arguments
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| UpstreamError::new(format!("'{field}' is not a number")))
}

/// Whole numbers print without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn adds_whole_numbers() {
        let result = AddTwoNumbers
            .call(json!({"a": 3, "b": 4}))
            .await
            .expect("sum");
        assert_eq!(result.text_content(), "The sum of 3 and 4 is 7");
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn adds_fractions_and_negatives() {
        let result = AddTwoNumbers
            .call(json!({"a": 2.5, "b": -1}))
            .await
            .expect("sum");
        assert_eq!(result.text_content(), "The sum of 2.5 and -1 is 1.5");
    }
}
