use crate::codec::{CodecConfig, WireDecode, WireEncode};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A function invocation requested by the model in an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCall {
    /// Position of the call within a streamed response; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Raw JSON text exactly as the model produced it. Not guaranteed valid.
    pub arguments: String,
}

impl ToolCall {
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            index: None,
            id: id.into(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// Parses the argument text into a caller-supplied type.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.function.arguments).map_err(|e| {
            tracing::warn!(
                tool = %self.function.name,
                "Model produced unparseable tool arguments: {}",
                e
            );
            Error::from(e)
        })
    }
}

impl WireEncode for ToolCall {
    fn to_wire(&self, _: &CodecConfig) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl WireDecode for ToolCall {
    fn from_wire(value: &Value, _: &CodecConfig) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }
}
