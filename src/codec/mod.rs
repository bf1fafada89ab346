//! Wire codec shared by the chat and responses payloads.
//!
//! Every polymorphic type in the crate converts to and from a
//! [`serde_json::Value`] through [`WireEncode`] / [`WireDecode`], taking a
//! [`CodecConfig`] on each call. Nothing here keeps state between calls.

pub mod data_uri;

use crate::chat::ChatMessage;
use crate::responses::ResponseInputItem;
use crate::{Error, Result};
use serde_json::{Map, Value};

pub use data_uri::{ImageDataUri, ImageSource};

/// Which historical shape of chat `content` the codec speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireVersion {
    /// `content` is a plain string, or an array of typed content items.
    /// Decoding tries the string form first.
    #[default]
    Multimodal,
    /// Legacy text-only chat API: `content` is always a plain string.
    TextOnly,
}

/// Settings threaded explicitly into every encode/decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecConfig {
    pub version: WireVersion,
    /// Emit indented JSON from the whole-document encoders.
    pub pretty: bool,
}

impl CodecConfig {
    pub fn new(version: WireVersion) -> Self {
        Self {
            version,
            pretty: false,
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub(crate) fn to_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

/// Conversion of a value into its JSON wire form.
pub trait WireEncode {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value>;

    fn to_bytes(&self, config: &CodecConfig) -> Result<Vec<u8>> {
        config.to_bytes(&self.to_wire(config)?)
    }
}

/// Construction of a value from its JSON wire form.
pub trait WireDecode: Sized {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self>;

    fn from_slice(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_wire(&value, config)
    }
}

/// Tries candidate decoders in a fixed order and keeps the first success.
///
/// Used wherever the wire format has no discriminator for the choice being
/// made: chat `content` (string, then array) and response input items
/// (message, tool output, tool call, reasoning).
pub struct Alternatives<'a, T> {
    value: &'a Value,
    config: &'a CodecConfig,
    outcome: Option<T>,
    failures: Vec<(&'static str, Error)>,
}

impl<'a, T> Alternatives<'a, T> {
    pub fn new(value: &'a Value, config: &'a CodecConfig) -> Self {
        Self {
            value,
            config,
            outcome: None,
            failures: Vec::new(),
        }
    }

    /// Runs `decode` unless an earlier alternative already matched.
    pub fn or_try<F>(mut self, shape: &'static str, decode: F) -> Self
    where
        F: FnOnce(&Value, &CodecConfig) -> Result<T>,
    {
        if self.outcome.is_some() {
            return self;
        }
        match decode(self.value, self.config) {
            Ok(decoded) => self.outcome = Some(decoded),
            Err(err) => {
                tracing::debug!(shape, error = %err, "wire shape rejected");
                self.failures.push((shape, err));
            }
        }
        self
    }

    /// Returns the first match, or every rejection in the order tried.
    pub fn finish(self) -> std::result::Result<T, Vec<(&'static str, Error)>> {
        match self.outcome {
            Some(decoded) => Ok(decoded),
            None => Err(self.failures),
        }
    }
}

/// Encodes a conversation as one JSON array.
pub fn encode_chat_messages(messages: &[ChatMessage], config: &CodecConfig) -> Result<Vec<u8>> {
    encode_all(messages, config)
}

pub fn decode_chat_messages(bytes: &[u8], config: &CodecConfig) -> Result<Vec<ChatMessage>> {
    decode_all(bytes, config)
}

/// Encodes a responses-API input sequence as one JSON array.
pub fn encode_input_items(items: &[ResponseInputItem], config: &CodecConfig) -> Result<Vec<u8>> {
    encode_all(items, config)
}

pub fn decode_input_items(bytes: &[u8], config: &CodecConfig) -> Result<Vec<ResponseInputItem>> {
    decode_all(bytes, config)
}

pub(crate) fn encode_list<T: WireEncode>(items: &[T], config: &CodecConfig) -> Result<Value> {
    items
        .iter()
        .map(|item| item.to_wire(config))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

pub(crate) fn decode_list<T: WireDecode>(
    value: &Value,
    field: &str,
    config: &CodecConfig,
) -> Result<Vec<T>> {
    value
        .as_array()
        .ok_or_else(|| Error::unexpected(field, "an array"))?
        .iter()
        .map(|item| T::from_wire(item, config))
        .collect()
}

fn encode_all<T: WireEncode>(items: &[T], config: &CodecConfig) -> Result<Vec<u8>> {
    config.to_bytes(&encode_list(items, config)?)
}

fn decode_all<T: WireDecode>(bytes: &[u8], config: &CodecConfig) -> Result<Vec<T>> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_list(&value, "document", config)
}

// Field access helpers. Absent and `null` are treated alike.

pub(crate) fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::unexpected(what, "an object"))
}

pub(crate) fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

pub(crate) fn required_str<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    optional_str(object, name)?.ok_or_else(|| Error::missing(name))
}

pub(crate) fn optional_str<'a>(
    object: &'a Map<String, Value>,
    name: &str,
) -> Result<Option<&'a str>> {
    match field(object, name) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(Error::unexpected(name, "a string")),
    }
}

/// Checks the `type` tag of a shape that has exactly one legal tag.
pub(crate) fn expect_tag(object: &Map<String, Value>, expected: &'static str) -> Result<()> {
    let tag = required_str(object, "type")?;
    if tag == expected {
        Ok(())
    } else {
        Err(Error::UnexpectedType {
            field: format!("type ({tag})"),
            expected,
        })
    }
}

/// Implements serde's traits for a wire type using the default config.
///
/// Lets callers embed codec types in their own serde structs; code that
/// needs a non-default [`CodecConfig`] goes through the wire traits.
macro_rules! impl_serde_via_wire {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let value = $crate::codec::WireEncode::to_wire(
                    self,
                    &$crate::codec::CodecConfig::default(),
                )
                .map_err(serde::ser::Error::custom)?;
                serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::codec::WireDecode>::from_wire(
                    &value,
                    &$crate::codec::CodecConfig::default(),
                )
                .map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_serde_via_wire;
