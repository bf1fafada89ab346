//! Input items of the responses API.
//!
//! Items share no top-level discriminator (a message may omit `type`), so
//! decoding tries each shape in a fixed order: message, tool output, tool
//! call, reasoning. The first shape that parses wins; changing the order
//! changes which variant ambiguous items land in.

use super::content::ResponseContentItem;
use super::tool_output::{FunctionCallItem, ToolOutput};
use crate::codec::{self, impl_serde_via_wire, Alternatives, CodecConfig, WireDecode, WireEncode};
use crate::{Error, Result};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    User,
    Assistant,
    System,
    Developer,
}

impl InputRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Developer => "developer",
        }
    }

    pub fn parse(role: &str) -> Result<Self> {
        match role {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            "developer" => Ok(Self::Developer),
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }

    /// Assistant messages carry only `output_text`; every other role only `input_*`.
    fn check(&self, item: &ResponseContentItem) -> Result<()> {
        if item.is_output() == (*self == Self::Assistant) {
            return Ok(());
        }
        Err(Error::MisplacedContent {
            role: self.as_str().to_string(),
            content_type: item.type_tag().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMessage {
    pub role: InputRole,
    pub content: Vec<ResponseContentItem>,
}

impl InputMessage {
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ResponseContentItem::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasoningItem {
    pub id: Option<String>,
    pub summary: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseInputItem {
    Message(InputMessage),
    Reasoning(ReasoningItem),
    ToolCall(FunctionCallItem),
    ToolOutput(ToolOutput),
}

impl ResponseInputItem {
    pub fn message(role: InputRole, content: Vec<ResponseContentItem>) -> Self {
        Self::Message(InputMessage { role, content })
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::message(InputRole::User, vec![ResponseContentItem::input_text(text)])
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::message(InputRole::System, vec![ResponseContentItem::input_text(text)])
    }

    pub fn developer(text: impl Into<String>) -> Self {
        Self::message(InputRole::Developer, vec![ResponseContentItem::input_text(text)])
    }

    /// Replays text the model produced in an earlier turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::message(InputRole::Assistant, vec![ResponseContentItem::output_text(text)])
    }
}

impl From<ToolOutput> for ResponseInputItem {
    fn from(output: ToolOutput) -> Self {
        Self::ToolOutput(output)
    }
}

impl From<FunctionCallItem> for ResponseInputItem {
    fn from(call: FunctionCallItem) -> Self {
        Self::ToolCall(call)
    }
}

impl WireEncode for ResponseInputItem {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        match self {
            Self::Message(message) => {
                for item in &message.content {
                    message.role.check(item)?;
                }
                Ok(json!({
                    "type": "message",
                    "role": message.role.as_str(),
                    "content": codec::encode_list(&message.content, config)?,
                }))
            }
            Self::Reasoning(reasoning) => {
                let mut object = Map::new();
                object.insert("type".to_string(), json!("reasoning"));
                if let Some(id) = &reasoning.id {
                    object.insert("id".to_string(), json!(id));
                }
                if let Some(summary) = &reasoning.summary {
                    let summary: Vec<Value> = summary
                        .iter()
                        .map(|text| json!({ "type": "summary_text", "text": text }))
                        .collect();
                    object.insert("summary".to_string(), Value::Array(summary));
                }
                Ok(Value::Object(object))
            }
            Self::ToolCall(call) => call.to_wire(config),
            Self::ToolOutput(output) => output.to_wire(config),
        }
    }
}

impl WireDecode for ResponseInputItem {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        Alternatives::new(value, config)
            .or_try("message", |value, config| {
                decode_message(value, config).map(Self::Message)
            })
            .or_try("tool_output", |value, config| {
                ToolOutput::from_wire(value, config).map(Self::ToolOutput)
            })
            .or_try("tool_call", |value, config| {
                FunctionCallItem::from_wire(value, config).map(Self::ToolCall)
            })
            .or_try("reasoning", |value, _| decode_reasoning(value).map(Self::Reasoning))
            .finish()
            .map_err(|failures| {
                let tag = value
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("<none>")
                    .to_string();
                let attempts = failures
                    .iter()
                    .map(|(shape, err)| format!("{shape}: {err}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                Error::NoMatchingInputItemShape { tag, attempts }
            })
    }
}

impl_serde_via_wire!(ResponseInputItem);

fn decode_message(value: &Value, config: &CodecConfig) -> Result<InputMessage> {
    let object = codec::as_object(value, "input item")?;
    if codec::field(object, "type").is_some() {
        codec::expect_tag(object, "message")?;
    }

    let role = InputRole::parse(codec::required_str(object, "role")?)?;
    let content = match codec::field(object, "content") {
        None => return Err(Error::missing("content")),
        // Shorthand accepted by the API for single-text messages.
        Some(Value::String(text)) if role == InputRole::Assistant => {
            vec![ResponseContentItem::output_text(text.as_str())]
        }
        Some(Value::String(text)) => vec![ResponseContentItem::input_text(text.as_str())],
        Some(content) => codec::decode_list(content, "content", config)?,
    };

    for item in &content {
        role.check(item)?;
    }
    Ok(InputMessage { role, content })
}

fn decode_reasoning(value: &Value) -> Result<ReasoningItem> {
    let object = codec::as_object(value, "input item")?;
    codec::expect_tag(object, "reasoning")?;
    Ok(ReasoningItem {
        id: codec::optional_str(object, "id")?.map(str::to_string),
        summary: codec::field(object, "summary").map(decode_summary).transpose()?,
    })
}

/// Summaries arrive either as plain strings or as `{"type":"summary_text","text":...}`.
pub(crate) fn decode_summary(value: &Value) -> Result<Vec<String>> {
    value
        .as_array()
        .ok_or_else(|| Error::unexpected("summary", "an array"))?
        .iter()
        .map(|part| match part {
            Value::String(text) => Ok(text.clone()),
            Value::Object(object) => codec::required_str(object, "text").map(str::to_string),
            _ => Err(Error::unexpected("summary[]", "a string or summary object")),
        })
        .collect()
}

/// The `input` of a create-response request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseInput {
    Text(String),
    Items(Vec<ResponseInputItem>),
}

impl From<&str> for ResponseInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ResponseInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<ResponseInputItem>> for ResponseInput {
    fn from(items: Vec<ResponseInputItem>) -> Self {
        Self::Items(items)
    }
}

impl WireEncode for ResponseInput {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        match self {
            Self::Text(text) => Ok(Value::String(text.clone())),
            Self::Items(items) => codec::encode_list(items, config),
        }
    }
}

impl WireDecode for ResponseInput {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self::Text(text.clone())),
            _ => codec::decode_list(value, "input", config).map(Self::Items),
        }
    }
}

impl_serde_via_wire!(ResponseInput);
