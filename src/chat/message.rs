//! Chat messages, discriminated on the wire by `role`.

use super::content::ContentOption;
use super::tool_call::ToolCall;
use crate::codec::{self, impl_serde_via_wire, CodecConfig, WireDecode, WireEncode};
use crate::{Error, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    System(String),
    User(ContentOption),
    Assistant(AssistantContent),
    Tool { content: String, tool_call_id: String },
}

/// What an assistant turn carries: plain text, or tool calls with any
/// text the model produced alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantContent {
    Text(String),
    ToolCalls {
        calls: Vec<ToolCall>,
        text: Option<String>,
        tool_call_id: Option<String>,
    },
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self::System(text.into())
    }

    pub fn user(content: impl Into<ContentOption>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant(AssistantContent::Text(text.into()))
    }

    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::Assistant(AssistantContent::ToolCalls {
            calls,
            text: None,
            tool_call_id: None,
        })
    }

    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::System(_) => "system",
            Self::User(_) => "user",
            Self::Assistant(_) => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    /// The message flattened to plain text.
    pub fn text(&self) -> String {
        match self {
            Self::System(text) | Self::Tool { content: text, .. } => text.clone(),
            Self::User(content) => content.text(),
            Self::Assistant(AssistantContent::Text(text)) => text.clone(),
            Self::Assistant(AssistantContent::ToolCalls { text, .. }) => {
                text.clone().unwrap_or_default()
            }
        }
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant(AssistantContent::ToolCalls { calls, .. }) => calls,
            _ => &[],
        }
    }
}

impl WireEncode for ChatMessage {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        let mut object = Map::new();
        object.insert("role".to_string(), Value::from(self.role()));

        match self {
            Self::System(text) => {
                object.insert("content".to_string(), Value::from(text.as_str()));
            }
            Self::User(content) => {
                object.insert("content".to_string(), content.to_wire(config)?);
            }
            Self::Assistant(AssistantContent::Text(text)) => {
                object.insert("content".to_string(), Value::from(text.as_str()));
            }
            Self::Assistant(AssistantContent::ToolCalls {
                calls,
                text,
                tool_call_id,
            }) => {
                if !calls.is_empty() {
                    object.insert("tool_calls".to_string(), codec::encode_list(calls, config)?);
                }
                let text = text.as_deref().unwrap_or_default();
                object.insert("content".to_string(), Value::from(text));
                if let Some(id) = tool_call_id {
                    object.insert("tool_call_id".to_string(), Value::from(id.as_str()));
                }
            }
            Self::Tool {
                content,
                tool_call_id,
            } => {
                if tool_call_id.is_empty() {
                    return Err(Error::missing("tool_call_id"));
                }
                object.insert("content".to_string(), Value::from(content.as_str()));
                object.insert("tool_call_id".to_string(), Value::from(tool_call_id.as_str()));
            }
        }

        Ok(Value::Object(object))
    }
}

impl WireDecode for ChatMessage {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        let object = codec::as_object(value, "message")?;

        match codec::required_str(object, "role")? {
            "system" => Ok(Self::System(
                codec::required_str(object, "content")?.to_string(),
            )),
            "user" => {
                let content =
                    codec::field(object, "content").ok_or_else(|| Error::missing("content"))?;
                Ok(Self::User(ContentOption::from_wire(content, config)?))
            }
            "assistant" => decode_assistant(object, config).map(Self::Assistant),
            "tool" => {
                let content = codec::required_str(object, "content")?.to_string();
                let tool_call_id = codec::optional_str(object, "tool_call_id")?
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| Error::missing("tool_call_id"))?
                    .to_string();
                Ok(Self::Tool {
                    content,
                    tool_call_id,
                })
            }
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }
}

impl_serde_via_wire!(ChatMessage);

fn decode_assistant(object: &Map<String, Value>, config: &CodecConfig) -> Result<AssistantContent> {
    // Assistant turns that only call tools come back with `content: null`.
    let text = codec::optional_str(object, "content")?
        .unwrap_or_default()
        .to_string();

    let calls: Vec<ToolCall> = match codec::field(object, "tool_calls") {
        Some(calls) => codec::decode_list(calls, "tool_calls", config)?,
        None => Vec::new(),
    };

    if calls.is_empty() {
        return Ok(AssistantContent::Text(text));
    }

    Ok(AssistantContent::ToolCalls {
        calls,
        text: Some(text),
        tool_call_id: codec::optional_str(object, "tool_call_id")?.map(str::to_string),
    })
}
