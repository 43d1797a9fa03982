//! Tool broker wire types

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::tools::ToolDescriptor;

/// `GET /v1/tools` page
#[derive(Debug, Clone, Deserialize)]
pub struct ToolListResponse {
    #[serde(default)]
    pub items: Vec<BrokerTool>,
}

/// A tool definition as the broker describes it
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerTool {
    pub name: String,
    #[serde(default)]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub toolkit: Option<Toolkit>,
    #[serde(default)]
    pub input: ToolInput,
    #[serde(default)]
    pub requirements: Option<Requirements>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Toolkit {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub value_schema: ValueSchema,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueSchema {
    pub val_type: String,
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default)]
    pub inner_val_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub authorization: Option<Value>,
}

impl BrokerTool {
    /// `Toolkit.Name`, falling back to the toolkit plus bare name
    pub fn qualified_name(&self) -> String {
        match (&self.qualified_name, &self.toolkit) {
            (Some(q), _) => q.clone(),
            (None, Some(toolkit)) => format!("{}.{}", toolkit.name, self.name),
            (None, None) => self.name.clone(),
        }
    }

    pub fn requires_authorization(&self) -> bool {
        self.requirements
            .as_ref()
            .and_then(|r| r.authorization.as_ref())
            .is_some_and(|auth| !auth.is_null())
    }

    /// JSON schema for the tool's input object
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.input.parameters {
            let mut schema = match param.value_schema.val_type.as_str() {
                "array" => {
                    let inner = param.value_schema.inner_val_type.as_deref().unwrap_or("string");
                    json!({"type": "array", "items": {"type": json_type(inner)}})
                }
                other => json!({"type": json_type(other)}),
            };
            if let Some(values) = &param.value_schema.enum_values {
                schema["enum"] = json!(values);
            }
            if let Some(description) = &param.description {
                schema["description"] = json!(description);
            }
            if param.required {
                required.push(param.name.clone());
            }
            properties.insert(param.name.clone(), schema);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn into_descriptor(self) -> ToolDescriptor {
        let qualified_name = self.qualified_name();
        ToolDescriptor {
            name: ToolDescriptor::exposed_name(&qualified_name),
            parameters: self.input_schema(),
            requires_authorization: self.requires_authorization(),
            description: self.description,
            qualified_name,
        }
    }
}

/// Broker value types that differ from JSON schema names
fn json_type(val_type: &str) -> &str {
    match val_type {
        "json" => "object",
        other => other,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest<'a> {
    pub tool_name: &'a str,
    pub user_id: &'a str,
}

/// Authorization state as returned by `authorize` and `auth/status`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl AuthorizationResponse {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest<'a> {
    pub tool_name: &'a str,
    pub input: &'a Value,
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub output: Option<ExecuteOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteOutput {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub error: Option<ExecuteError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteError {
    pub message: String,
}
