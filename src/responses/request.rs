use super::input::ResponseInput;
use crate::codec::{CodecConfig, WireEncode};
use crate::tool::Tool;
use crate::Result;
use serde_json::{json, Map, Value};

const DEFAULT_SCHEMA_NAME: &str = "response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Output format, sent as `"text": {"format": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseTextFormat {
    Text,
    JsonObject,
    JsonSchema { schema: Value, name: Option<String> },
}

impl ResponseTextFormat {
    fn to_wire(&self) -> Value {
        match self {
            Self::Text => json!({ "type": "text" }),
            Self::JsonObject => json!({ "type": "json_object" }),
            Self::JsonSchema { schema, name } => json!({
                "type": "json_schema",
                "name": name.as_deref().unwrap_or(DEFAULT_SCHEMA_NAME),
                "strict": true,
                "schema": schema,
            }),
        }
    }
}

/// Request body for `POST /v1/responses`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResponseRequest {
    pub model: String,
    pub input: ResponseInput,
    pub include: Vec<String>,
    pub instructions: Option<String>,
    pub previous_response_id: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub text_format: Option<ResponseTextFormat>,
    pub metadata: Map<String, Value>,
    pub store: bool,
    pub tools: Vec<Tool>,
    pub user: Option<String>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl CreateResponseRequest {
    pub fn new(model: impl Into<String>, input: impl Into<ResponseInput>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            include: Vec::new(),
            instructions: None,
            previous_response_id: None,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            text_format: None,
            metadata: Map::new(),
            store: true,
            tools: Vec::new(),
            user: None,
            reasoning_effort: None,
        }
    }
}

impl WireEncode for CreateResponseRequest {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert("input".to_string(), self.input.to_wire(config)?);
        body.insert("store".to_string(), json!(self.store));

        let optional = [
            ("instructions", self.instructions.as_deref().map(Value::from)),
            ("previous_response_id", self.previous_response_id.as_deref().map(Value::from)),
            ("max_output_tokens", self.max_output_tokens.map(Value::from)),
            ("temperature", self.temperature.map(Value::from)),
            ("top_p", self.top_p.map(Value::from)),
            ("user", self.user.as_deref().map(Value::from)),
            ("text", self.text_format.as_ref().map(|format| json!({ "format": format.to_wire() }))),
            ("reasoning", self.reasoning_effort.map(|effort| json!({ "effort": effort.as_str() }))),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        }

        if !self.include.is_empty() {
            body.insert("include".to_string(), json!(self.include));
        }
        if !self.metadata.is_empty() {
            body.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        }
        if !self.tools.is_empty() {
            let tools = self
                .tools
                .iter()
                .map(Tool::to_responses_wire)
                .collect::<Result<Vec<_>>>()?;
            body.insert("tools".to_string(), Value::Array(tools));
        }

        Ok(Value::Object(body))
    }
}
