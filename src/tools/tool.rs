//! Tool descriptor definition
//!
//! Tools live in the tool broker; the agent only sees their descriptors and
//! calls them by name through a backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::ToolDefinition;

/// Result of executing a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The output of the tool
    pub output: String,
    /// Whether the tool execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            is_error: true,
        }
    }
}

/// A callable remote tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Name exposed to the model (`Confluence_GetPage`)
    pub name: String,
    /// Name the broker knows the tool by (`Confluence.GetPage`)
    pub qualified_name: String,
    pub description: Option<String>,
    /// JSON schema of the input object
    pub parameters: Value,
    /// Whether the tool needs a third-party authorization before running
    pub requires_authorization: bool,
}

impl ToolDescriptor {
    /// Model-facing name for a broker qualified name
    pub fn exposed_name(qualified_name: &str) -> String {
        qualified_name.replace('.', "_")
    }

    /// Get the function definition sent to the model
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name.clone(),
            self.description.clone(),
            self.parameters.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("output");
        assert_eq!(result.output, "output");
        assert!(!result.is_error);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("error message");
        assert_eq!(result.output, "error message");
        assert!(result.is_error);
    }

    #[test]
    fn test_definition() {
        let tool = ToolDescriptor {
            name: ToolDescriptor::exposed_name("Confluence.GetPage"),
            qualified_name: "Confluence.GetPage".into(),
            description: Some("Get a page".into()),
            parameters: json!({"type": "object", "properties": {}}),
            requires_authorization: true,
        };

        let def = tool.definition();
        assert_eq!(def.tool_type, "function");
        assert_eq!(def.function.name, "Confluence_GetPage");
        assert_eq!(def.function.description.as_deref(), Some("Get a page"));
    }
}
