use super::message::ChatMessage;
use crate::codec::{self, CodecConfig, WireEncode};
use crate::tool::Tool;
use crate::Result;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

const DEFAULT_SCHEMA_NAME: &str = "response";

/// Request body for `/v1/chat/completions`. `stream` is set by the provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub n: Option<u32>,
    pub stop: Vec<String>,
    pub max_tokens: Option<u32>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub logit_bias: BTreeMap<String, i32>,
    pub user: Option<String>,
    pub response_format: Option<ChatResponseFormat>,
    pub tools: Vec<Tool>,
}

/// Structured-output directive for chat completions.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResponseFormat {
    JsonObject,
    JsonSchema { schema: Value, name: Option<String> },
}

impl ChatResponseFormat {
    fn to_wire(&self) -> Value {
        match self {
            Self::JsonObject => json!({ "type": "json_object" }),
            Self::JsonSchema { schema, name } => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name.as_deref().unwrap_or(DEFAULT_SCHEMA_NAME),
                    "strict": true,
                    "schema": schema,
                },
            }),
        }
    }
}

impl CreateChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }

    pub(crate) fn to_body(&self, config: &CodecConfig, stream: bool) -> Result<Value> {
        let mut body = match self.to_wire(config)? {
            Value::Object(body) => body,
            _ => Map::new(),
        };
        body.insert("stream".to_string(), Value::Bool(stream));
        Ok(Value::Object(body))
    }
}

impl WireEncode for CreateChatRequest {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        let mut body = Map::new();
        body.insert("model".to_string(), Value::from(self.model.as_str()));
        body.insert("messages".to_string(), codec::encode_list(&self.messages, config)?);

        let optional = [
            ("temperature", self.temperature.map(Value::from)),
            ("top_p", self.top_p.map(Value::from)),
            ("n", self.n.map(Value::from)),
            ("max_tokens", self.max_tokens.map(Value::from)),
            ("presence_penalty", self.presence_penalty.map(Value::from)),
            ("frequency_penalty", self.frequency_penalty.map(Value::from)),
            ("user", self.user.as_deref().map(Value::from)),
            ("response_format", self.response_format.as_ref().map(ChatResponseFormat::to_wire)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        }

        if !self.stop.is_empty() {
            body.insert("stop".to_string(), json!(self.stop));
        }
        if !self.logit_bias.is_empty() {
            body.insert("logit_bias".to_string(), json!(self.logit_bias));
        }
        if !self.tools.is_empty() {
            let tools = self
                .tools
                .iter()
                .map(Tool::to_chat_wire)
                .collect::<Result<Vec<_>>>()?;
            body.insert("tools".to_string(), Value::Array(tools));
        }

        Ok(Value::Object(body))
    }
}
