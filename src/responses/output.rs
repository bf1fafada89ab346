use super::input::{decode_summary, InputMessage, InputRole, ReasoningItem, ResponseInputItem};
use super::content::ResponseContentItem;
use super::tool_output::FunctionCallItem;
use crate::codec::{self, CodecConfig, WireDecode, WireEncode};
use crate::{Error, Result};
use serde_json::{json, Map, Value};

/// A part of an output message.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputContent {
    OutputText { text: String, annotations: Vec<Value> },
    Refusal(String),
}

impl WireDecode for OutputContent {
    fn from_wire(value: &Value, _: &CodecConfig) -> Result<Self> {
        let object = codec::as_object(value, "content[]")?;
        match codec::required_str(object, "type")? {
            "output_text" => Ok(Self::OutputText {
                text: codec::required_str(object, "text")?.to_string(),
                annotations: match codec::field(object, "annotations") {
                    Some(Value::Array(annotations)) => annotations.clone(),
                    Some(_) => return Err(Error::unexpected("annotations", "an array")),
                    None => Vec::new(),
                },
            }),
            "refusal" => Ok(Self::Refusal(codec::required_str(object, "refusal")?.to_string())),
            other => Err(Error::UnknownContentType(other.to_string())),
        }
    }
}

impl WireEncode for OutputContent {
    fn to_wire(&self, _: &CodecConfig) -> Result<Value> {
        Ok(match self {
            Self::OutputText { text, annotations } => {
                json!({ "type": "output_text", "text": text, "annotations": annotations })
            }
            Self::Refusal(refusal) => json!({ "type": "refusal", "refusal": refusal }),
        })
    }
}

/// One item of a response's `output`. Which fields are set depends on
/// `item_type` (`message`, `reasoning`, `function_call`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub id: String,
    pub item_type: String,
    pub status: Option<String>,
    pub role: Option<String>,
    pub content: Option<Vec<OutputContent>>,
    pub summary: Option<Vec<String>>,
    pub name: Option<String>,
    pub arguments: Option<String>,
    pub call_id: Option<String>,
}

impl OutputItem {
    pub fn is_message(&self) -> bool {
        self.item_type == "message"
    }

    pub fn is_function_call(&self) -> bool {
        self.item_type == "function_call"
    }

    pub fn is_reasoning(&self) -> bool {
        self.item_type == "reasoning"
    }

    /// Output text of a message item, joined with newlines.
    pub fn text(&self) -> Option<String> {
        let content = self.content.as_ref()?;
        let texts: Vec<&str> = content
            .iter()
            .filter_map(|part| match part {
                OutputContent::OutputText { text, .. } => Some(text.as_str()),
                OutputContent::Refusal(_) => None,
            })
            .collect();
        (!texts.is_empty()).then(|| texts.join("\n"))
    }

    pub fn refusal(&self) -> Option<&str> {
        self.content.as_ref()?.iter().find_map(|part| match part {
            OutputContent::Refusal(refusal) => Some(refusal.as_str()),
            OutputContent::OutputText { .. } => None,
        })
    }

    /// Re-wraps the item so it can be sent back as conversation history.
    ///
    /// Message text becomes `output_text`, never `input_text`. Returns
    /// `None` for item types that have no input form.
    pub fn to_input_item(&self) -> Result<Option<ResponseInputItem>> {
        let item = match self.item_type.as_str() {
            "message" => {
                let role = match &self.role {
                    Some(role) => InputRole::parse(role)?,
                    None => InputRole::Assistant,
                };
                let content = self
                    .content
                    .iter()
                    .flatten()
                    .filter_map(|part| match part {
                        OutputContent::OutputText { text, .. } => {
                            Some(ResponseContentItem::output_text(text.as_str()))
                        }
                        OutputContent::Refusal(_) => None,
                    })
                    .collect();
                ResponseInputItem::Message(InputMessage { role, content })
            }
            "function_call" => ResponseInputItem::ToolCall(FunctionCallItem {
                id: Some(self.id.clone()),
                call_id: self.call_id.clone().ok_or_else(|| Error::missing("call_id"))?,
                name: self.name.clone().ok_or_else(|| Error::missing("name"))?,
                arguments: self.arguments.clone().ok_or_else(|| Error::missing("arguments"))?,
                status: self.status.clone(),
            }),
            "reasoning" => ResponseInputItem::Reasoning(ReasoningItem {
                id: Some(self.id.clone()),
                summary: Some(self.summary.clone().unwrap_or_default()),
            }),
            other => {
                tracing::debug!(item_type = other, "Output item has no input form");
                return Ok(None);
            }
        };
        Ok(Some(item))
    }
}

impl WireDecode for OutputItem {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        let object = codec::as_object(value, "output[]")?;
        let string = |name: &str| -> Result<Option<String>> {
            Ok(codec::optional_str(object, name)?.map(str::to_string))
        };

        Ok(Self {
            id: codec::required_str(object, "id")?.to_string(),
            item_type: codec::required_str(object, "type")?.to_string(),
            status: string("status")?,
            role: string("role")?,
            content: codec::field(object, "content")
                .map(|content| codec::decode_list(content, "content", config))
                .transpose()?,
            summary: codec::field(object, "summary").map(decode_summary).transpose()?,
            name: string("name")?,
            arguments: string("arguments")?,
            call_id: string("call_id")?,
        })
    }
}

impl WireEncode for OutputItem {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        let mut object = Map::new();
        object.insert("id".to_string(), json!(self.id));
        object.insert("type".to_string(), json!(self.item_type));
        let strings = [
            ("status", &self.status),
            ("role", &self.role),
            ("name", &self.name),
            ("arguments", &self.arguments),
            ("call_id", &self.call_id),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                object.insert(key.to_string(), json!(value));
            }
        }
        if let Some(content) = &self.content {
            object.insert("content".to_string(), codec::encode_list(content, config)?);
        }
        if let Some(summary) = &self.summary {
            let summary: Vec<Value> = summary
                .iter()
                .map(|text| json!({ "type": "summary_text", "text": text }))
                .collect();
            object.insert("summary".to_string(), Value::Array(summary));
        }
        Ok(Value::Object(object))
    }
}
