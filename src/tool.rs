//! Tool definitions offered to the model.
//!
//! The chat API nests function details under a `function` key, the
//! responses API puts them at the top level.

use crate::{Error, Result};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Function,
    WebSearch,
    FileSearch,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::WebSearch => "web_search",
            Self::FileSearch => "file_search",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub kind: ToolKind,
    pub name: String,
    pub description: Option<String>,
    /// JSON schema of the arguments for functions; extra settings for
    /// hosted tools (for example `vector_store_ids`).
    pub parameters: Value,
}

impl Tool {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: ToolKind::Function,
            name: name.into(),
            description: Some(description.into()),
            parameters,
        }
    }

    pub fn web_search() -> Self {
        Self {
            kind: ToolKind::WebSearch,
            name: String::new(),
            description: None,
            parameters: Value::Null,
        }
    }

    pub fn file_search(vector_store_ids: Vec<String>) -> Self {
        Self {
            kind: ToolKind::FileSearch,
            name: String::new(),
            description: None,
            parameters: json!({ "vector_store_ids": vector_store_ids }),
        }
    }

    /// `{"type":"function","function":{name, description, parameters}}`
    pub fn to_chat_wire(&self) -> Result<Value> {
        if self.kind != ToolKind::Function {
            return Err(Error::UnsupportedEncoding(format!(
                "chat completions only accept function tools, got `{}`",
                self.kind.as_str()
            )));
        }
        Ok(json!({
            "type": "function",
            "function": self.function_fields(),
        }))
    }

    /// `{"type":"function", name, description, parameters}`; hosted tools
    /// carry their settings at the top level instead.
    pub fn to_responses_wire(&self) -> Result<Value> {
        let mut object = match self.kind {
            ToolKind::Function => self.function_fields(),
            ToolKind::WebSearch | ToolKind::FileSearch => match &self.parameters {
                Value::Null => Map::new(),
                Value::Object(settings) => settings.clone(),
                _ => {
                    return Err(Error::unexpected("parameters", "an object"));
                }
            },
        };
        object.insert("type".to_string(), Value::from(self.kind.as_str()));
        Ok(Value::Object(object))
    }

    fn function_fields(&self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("name".to_string(), Value::from(self.name.as_str()));
        if let Some(description) = &self.description {
            object.insert("description".to_string(), Value::from(description.as_str()));
        }
        object.insert("parameters".to_string(), self.parameters.clone());
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn weather() -> Tool {
        Tool::function(
            "get_weather",
            "Current weather for a city",
            json!({ "type": "object", "properties": { "city": { "type": "string" } } }),
        )
    }

    #[test]
    fn test_chat_shape_is_nested() {
        assert_eq!(
            weather().to_chat_wire().unwrap(),
            json!({
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Current weather for a city",
                    "parameters": {
                        "type": "object",
                        "properties": { "city": { "type": "string" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_responses_shape_is_flat() {
        assert_eq!(
            weather().to_responses_wire().unwrap(),
            json!({
                "type": "function",
                "name": "get_weather",
                "description": "Current weather for a city",
                "parameters": { "type": "object", "properties": { "city": { "type": "string" } } }
            })
        );
    }

    #[test]
    fn test_hosted_tools() {
        assert_eq!(
            Tool::web_search().to_responses_wire().unwrap(),
            json!({ "type": "web_search" })
        );
        assert_eq!(
            Tool::file_search(vec!["vs_1".to_string()]).to_responses_wire().unwrap(),
            json!({ "type": "file_search", "vector_store_ids": ["vs_1"] })
        );
        assert!(matches!(
            Tool::web_search().to_chat_wire(),
            Err(Error::UnsupportedEncoding(_))
        ));
    }
}
