// Tool registry: declared parameters, argument validation and dispatch

use crate::error::{McpError, McpResult};
use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> String;

    /// Declared parameters, validated by the registry before `execute`
    fn params(&self) -> Vec<ParamSpec>;

    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema {
        let params = self.params();
        let properties: Map<String, Value> = params
            .iter()
            .map(|p| (p.name.to_string(), p.json_schema()))
            .collect();
        let required: Vec<&str> = params.iter().filter(|p| p.is_required()).map(|p| p.name).collect();

        ToolSchema {
            name: self.name().to_string(),
            description: self.description(),
            input_schema: json_schema_object(Value::Object(properties), required),
        }
    }

    /// Execute the tool with arguments that already match `params`
    async fn execute(&self, arguments: Value) -> Result<CallToolResult>;
}

/// Accepted JSON type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer { min: i64, max: i64 },
}

/// One declared tool parameter; parameters without a default are required
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::String,
            description,
            default: None,
        }
    }

    pub fn integer(name: &'static str, description: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: ParamKind::Integer { min, max },
            description,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    fn json_schema(&self) -> Value {
        let mut schema = match self.kind {
            ParamKind::String => json_schema_string(self.description),
            ParamKind::Integer { min, max } => json_schema_integer(self.description, min, max),
        };
        if let (Some(default), Value::Object(map)) = (&self.default, &mut schema) {
            map.insert("default".to_string(), default.clone());
        }
        schema
    }

    /// Coerce a supplied value to this parameter's kind
    fn coerce(&self, value: &Value) -> std::result::Result<Value, String> {
        match self.kind {
            ParamKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                other => Err(format!(
                    "'{}' must be a string, got {}",
                    self.name,
                    json_type_name(other)
                )),
            },
            ParamKind::Integer { min, max } => {
                let parsed = match value {
                    Value::Number(n) => n.as_i64().or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                            .map(|f| f as i64)
                    }),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                let n = parsed.ok_or_else(|| {
                    format!("'{}' must be an integer, got {}", self.name, value)
                })?;
                if n < min || n > max {
                    return Err(format!(
                        "'{}' must be between {} and {}, got {}",
                        self.name, min, max, n
                    ));
                }
                Ok(Value::from(n))
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate raw call arguments against declared parameters.
///
/// Unknown keys are dropped, missing or null keys take their default, and
/// values are coerced where the intent is unambiguous.
pub fn validate_arguments(tool: &str, params: &[ParamSpec], arguments: &Value) -> McpResult<Value> {
    let supplied = match arguments {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(McpError::invalid_arguments(
                tool,
                format!("arguments must be an object, got {}", json_type_name(other)),
            ))
        }
    };

    let mut validated = Map::new();
    for param in params {
        let value = match supplied.get(param.name) {
            Some(Value::Null) | None => match &param.default {
                Some(default) => default.clone(),
                None => {
                    return Err(McpError::invalid_arguments(
                        tool,
                        format!("missing required argument '{}'", param.name),
                    ))
                }
            },
            Some(value) => param
                .coerce(value)
                .map_err(|message| McpError::invalid_arguments(tool, message))?,
        };
        validated.insert(param.name.to_string(), value);
    }

    for key in supplied.keys() {
        if !params.iter().any(|p| p.name == key) {
            tracing::debug!(tool, argument = %key, "Ignoring unknown argument");
        }
    }

    Ok(Value::Object(validated))
}

/// Tool registry for managing available tools, in registration order
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool; names must be unique
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> McpResult<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(McpError::DuplicateRegistration(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up, validate and run a tool
    pub async fn invoke(&self, name: &str, arguments: &Value) -> McpResult<CallToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;
        let arguments = validate_arguments(name, &tool.params(), arguments)?;

        tracing::debug!(tool = name, %arguments, "Invoking tool");
        Ok(tool.execute(arguments).await?)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str, minimum: i64, maximum: i64) -> Value {
    serde_json::json!({
        "type": "integer",
        "description": description,
        "minimum": minimum,
        "maximum": maximum
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> String {
            "Echo the validated arguments".to_string()
        }

        fn params(&self) -> Vec<ParamSpec> {
            vec![
                ParamSpec::string("text", "Text to echo"),
                ParamSpec::integer("times", "Repetitions", 0, 10).with_default(1),
            ]
        }

        async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
            Ok(CallToolResult::text(arguments.to_string()))
        }
    }

    fn echo_params() -> Vec<ParamSpec> {
        EchoTool.params()
    }

    #[test]
    fn test_defaults_and_unknown_keys() {
        let validated =
            validate_arguments("echo", &echo_params(), &json!({"text": "hi", "extra": 1})).unwrap();
        assert_eq!(validated, json!({"text": "hi", "times": 1}));
    }

    #[test]
    fn test_coercion() {
        let validated =
            validate_arguments("echo", &echo_params(), &json!({"text": 5, "times": "3"})).unwrap();
        assert_eq!(validated, json!({"text": "5", "times": 3}));

        let validated =
            validate_arguments("echo", &echo_params(), &json!({"text": "a", "times": 2.0})).unwrap();
        assert_eq!(validated["times"], json!(2));
    }

    #[test]
    fn test_rejections() {
        let missing = validate_arguments("echo", &echo_params(), &json!({}));
        assert!(matches!(missing, Err(McpError::InvalidArguments { .. })));

        let bad_int = validate_arguments("echo", &echo_params(), &json!({"text": "a", "times": "many"}));
        assert!(matches!(bad_int, Err(McpError::InvalidArguments { .. })));

        let out_of_range =
            validate_arguments("echo", &echo_params(), &json!({"text": "a", "times": 11}));
        assert!(matches!(out_of_range, Err(McpError::InvalidArguments { .. })));

        let not_object = validate_arguments("echo", &echo_params(), &json!([1, 2]));
        assert!(matches!(not_object, Err(McpError::InvalidArguments { .. })));

        let nested = validate_arguments("echo", &echo_params(), &json!({"text": {"a": 1}}));
        assert!(matches!(nested, Err(McpError::InvalidArguments { .. })));
    }

    #[test]
    fn test_schema_generation() {
        let schema = EchoTool.schema();
        assert_eq!(schema.name, "echo");
        assert_eq!(schema.input_schema["type"], "object");
        assert_eq!(schema.input_schema["required"], json!(["text"]));
        assert_eq!(schema.input_schema["properties"]["times"]["default"], json!(1));
        assert_eq!(schema.input_schema["properties"]["times"]["type"], "integer");
    }

    #[tokio::test]
    async fn test_registry_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();
        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let duplicate = registry.register(Arc::new(EchoTool));
        assert!(matches!(duplicate, Err(McpError::DuplicateRegistration(_))));

        let result = registry.invoke("echo", &json!({"text": "x"})).await.unwrap();
        assert_eq!(result.joined_text(), r#"{"text":"x","times":1}"#);

        let unknown = registry.invoke("nope", &json!({})).await;
        assert!(matches!(unknown, Err(McpError::UnknownTool(name)) if name == "nope"));
    }
}
