//! Function calls and their results as responses-API items.
//!
//! These correlate through `call_id`, where chat messages use `tool_call_id`.

use crate::chat::ToolCall;
use crate::codec::{CodecConfig, WireDecode, WireEncode};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `function_call` item the model emitted, replayed as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub call_id: String,
    pub name: String,
    pub arguments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl FunctionCallItem {
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
            status: None,
        }
    }
}

impl From<&ToolCall> for FunctionCallItem {
    fn from(call: &ToolCall) -> Self {
        Self::new(&call.id, &call.function.name, &call.function.arguments)
    }
}

/// The `type` tag both items carry on the wire.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedRef<'a> {
    FunctionCall(&'a FunctionCallItem),
    FunctionCallOutput(&'a ToolOutput),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Tagged {
    FunctionCall(FunctionCallItem),
    FunctionCallOutput(ToolOutput),
}

impl Tagged {
    fn tag(&self) -> &'static str {
        match self {
            Self::FunctionCall(_) => "function_call",
            Self::FunctionCallOutput(_) => "function_call_output",
        }
    }
}

fn mismatched(found: &Tagged, expected: &'static str) -> Error {
    Error::UnexpectedType {
        field: format!("type ({})", found.tag()),
        expected,
    }
}

impl WireEncode for FunctionCallItem {
    fn to_wire(&self, _: &CodecConfig) -> Result<Value> {
        Ok(serde_json::to_value(TaggedRef::FunctionCall(self))?)
    }
}

impl WireDecode for FunctionCallItem {
    fn from_wire(value: &Value, _: &CodecConfig) -> Result<Self> {
        match Tagged::deserialize(value)? {
            Tagged::FunctionCall(item) => Ok(item),
            other => Err(mismatched(&other, "function_call")),
        }
    }
}

/// The caller's answer to a function call.
///
/// `output` is always sent as a string. Structured results are serialized
/// to JSON text first, and decoding hands the text back unparsed since the
/// tool's schema is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub call_id: String,
    pub output: String,
}

impl ToolOutput {
    pub fn from_raw(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            output: output.into(),
        }
    }

    /// Serializes `payload` to JSON text.
    pub fn json<T: Serialize>(call_id: impl Into<String>, payload: &T) -> Result<Self> {
        Ok(Self::from_raw(call_id, serde_json::to_string(payload)?))
    }

    pub fn parse_output<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.output)?)
    }
}

impl WireEncode for ToolOutput {
    fn to_wire(&self, _: &CodecConfig) -> Result<Value> {
        Ok(serde_json::to_value(TaggedRef::FunctionCallOutput(self))?)
    }
}

impl WireDecode for ToolOutput {
    fn from_wire(value: &Value, _: &CodecConfig) -> Result<Self> {
        match Tagged::deserialize(value)? {
            Tagged::FunctionCallOutput(output) => Ok(output),
            other => Err(mismatched(&other, "function_call_output")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Forecast {
        city: String,
        celsius: i32,
    }

    #[test]
    fn test_json_output_is_sent_as_string() {
        let forecast = Forecast {
            city: "Oslo".to_string(),
            celsius: -3,
        };
        let output = ToolOutput::json("call_1", &forecast).unwrap();
        let value = output.to_wire(&CodecConfig::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "function_call_output",
                "call_id": "call_1",
                "output": "{\"city\":\"Oslo\",\"celsius\":-3}"
            })
        );
    }

    #[test]
    fn test_decoded_output_stays_opaque_until_parsed() {
        let value = json!({
            "type": "function_call_output",
            "call_id": "call_1",
            "output": "{\"city\":\"Rome\",\"celsius\":21}"
        });
        let output = ToolOutput::from_wire(&value, &CodecConfig::default()).unwrap();

        assert_eq!(output.output, "{\"city\":\"Rome\",\"celsius\":21}");
        assert_eq!(
            output.parse_output::<Forecast>().unwrap(),
            Forecast { city: "Rome".to_string(), celsius: 21 }
        );
    }

    #[test]
    fn test_output_must_be_a_string() {
        let value =
            json!({ "type": "function_call_output", "call_id": "c", "output": { "ok": true } });
        let err = ToolOutput::from_wire(&value, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_function_call_from_chat_tool_call() {
        let call = ToolCall::function("call_7", "lookup", "{\"id\":7}");
        let item = FunctionCallItem::from(&call);
        assert_eq!(
            item.to_wire(&CodecConfig::default()).unwrap(),
            json!({
                "type": "function_call",
                "call_id": "call_7",
                "name": "lookup",
                "arguments": "{\"id\":7}"
            })
        );
    }

    #[test]
    fn test_function_call_requires_tag() {
        let value = json!({ "call_id": "c", "name": "n", "arguments": "{}" });
        let err = FunctionCallItem::from_wire(&value, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)), "{err:?}");
        assert!(err.to_string().contains("missing field `type`"));
    }

    #[test]
    fn test_items_reject_each_others_tag() {
        let output = json!({ "type": "function_call_output", "call_id": "c", "output": "ok" });
        let err = FunctionCallItem::from_wire(&output, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedType { expected: "function_call", .. }));

        let call =
            json!({ "type": "function_call", "call_id": "c", "name": "n", "arguments": "{}" });
        let err = ToolOutput::from_wire(&call, &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedType { expected: "function_call_output", .. }));

        let reasoning = json!({ "type": "reasoning", "call_id": "c", "output": "ok" });
        assert!(ToolOutput::from_wire(&reasoning, &CodecConfig::default()).is_err());
    }

    #[test]
    fn test_function_call_keeps_optional_id_and_status() {
        let value = json!({
            "type": "function_call",
            "id": "fc_1",
            "call_id": "call_1",
            "name": "lookup",
            "arguments": "{}",
            "status": "completed"
        });

        let item = FunctionCallItem::from_wire(&value, &CodecConfig::default()).unwrap();
        assert_eq!(item.id.as_deref(), Some("fc_1"));
        assert_eq!(item.status.as_deref(), Some("completed"));
        assert_eq!(item.to_wire(&CodecConfig::default()).unwrap(), value);
    }
}
