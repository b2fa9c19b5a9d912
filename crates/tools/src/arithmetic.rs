//! Arithmetic tool — add, subtract, multiply two numbers.

use async_trait::async_trait;
use drafter_core::error::ToolError;
use drafter_core::tool::{Tool, ToolResult};

pub struct ArithmeticTool;

#[async_trait]
impl Tool for ArithmeticTool {
    fn name(&self) -> &str {
        "arithmetic"
    }

    fn description(&self) -> &str {
        "Perform basic arithmetic on two numbers. \
         Supported operations: add, subtract, multiply."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply"],
                    "description": "The operation to perform"
                },
                "a": { "type": "number", "description": "The first operand" },
                "b": { "type": "number", "description": "The second operand" }
            },
            "required": ["operation", "a", "b"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let operation = arguments["operation"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'operation' argument".into()))?;
        let a = arguments["a"]
            .as_f64()
            .ok_or_else(|| ToolError::InvalidArguments("Missing numeric 'a' argument".into()))?;
        let b = arguments["b"]
            .as_f64()
            .ok_or_else(|| ToolError::InvalidArguments("Missing numeric 'b' argument".into()))?;

        let value = match operation {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "Unknown operation: {other}. Must be add, subtract, or multiply."
                )))
            }
        };

        Ok(ToolResult::ok(format_number(value)))
    }
}

/// Format a result nicely: integers render without a trailing `.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
