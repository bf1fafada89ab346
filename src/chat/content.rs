//! Chat message content: a plain string or an array of typed content items.

use crate::codec::data_uri::{self, ImageDataUri, ImageSource};
use crate::codec::{
    self, impl_serde_via_wire, Alternatives, CodecConfig, WireDecode, WireEncode, WireVersion,
};
use crate::{Error, Result};
use serde_json::{json, Value};

/// One element of a multimodal chat `content` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Text(String),
    /// Remote image reference.
    ImageUrl(String),
    /// Inline image, carried on the wire as a base64 data URI.
    Image { data: Vec<u8>, subtype: String },
    /// Remote audio reference. Decode only.
    AudioUrl(String),
    /// Inline audio. Cannot be encoded.
    Audio(Vec<u8>),
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl(url.into())
    }

    pub fn image(data: Vec<u8>, subtype: impl Into<String>) -> Self {
        Self::Image {
            data,
            subtype: subtype.into(),
        }
    }

    /// Inline image with the subtype sniffed from the bytes.
    pub fn image_bytes(data: Vec<u8>) -> Self {
        let ImageDataUri { data, subtype } = ImageDataUri::from_bytes(data);
        Self::Image { data, subtype }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn type_tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::ImageUrl(_) | Self::Image { .. } => "image_url",
            Self::AudioUrl(_) | Self::Audio(_) => "audio_url",
        }
    }
}

impl WireEncode for ContentItem {
    fn to_wire(&self, _: &CodecConfig) -> Result<Value> {
        match self {
            Self::Text(text) => Ok(json!({ "type": "text", "text": text })),
            Self::ImageUrl(url) => Ok(json!({ "type": "image_url", "image_url": { "url": url } })),
            Self::Image { data, subtype } => Ok(json!({
                "type": "image_url",
                "image_url": { "url": data_uri::pack(data, subtype) },
            })),
            Self::AudioUrl(_) | Self::Audio(_) => Err(Error::UnsupportedEncoding(format!(
                "`{}` content items cannot be sent",
                self.type_tag()
            ))),
        }
    }
}

impl WireDecode for ContentItem {
    fn from_wire(value: &Value, _: &CodecConfig) -> Result<Self> {
        let object = codec::as_object(value, "content[]")?;
        match codec::required_str(object, "type")? {
            "text" => Ok(Self::Text(codec::required_str(object, "text")?.to_string())),
            "image_url" => {
                let url = nested_url(object, "image_url")?;
                Ok(match data_uri::classify(url)? {
                    ImageSource::Remote(url) => Self::ImageUrl(url),
                    ImageSource::Inline(ImageDataUri { data, subtype }) => {
                        Self::Image { data, subtype }
                    }
                })
            }
            "audio_url" => {
                let url = nested_url(object, "audio_url")?;
                if data_uri::is_remote(url) {
                    Ok(Self::AudioUrl(url.to_string()))
                } else {
                    Err(Error::UnsupportedEncoding(
                        "inline audio payloads are not supported".to_string(),
                    ))
                }
            }
            other => Err(Error::UnknownContentType(other.to_string())),
        }
    }
}

impl_serde_via_wire!(ContentItem);

/// Reads `{"<key>": {"url": "..."}}`.
fn nested_url<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a str> {
    let inner = codec::field(object, key).ok_or_else(|| Error::missing(key))?;
    let inner = codec::as_object(inner, key)?;
    codec::optional_str(inner, "url")?.ok_or_else(|| Error::MissingField(format!("{key}.url")))
}

/// The `content` of a user message.
///
/// Decoding never converts between the two forms: a string stays `Text`
/// and a one-element text array stays `Content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOption {
    Text(String),
    Content(Vec<ContentItem>),
}

impl ContentOption {
    /// Flattens the content to text. Non-text items are dropped and
    /// multiple text items are joined with newlines.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Content(items) => items
                .iter()
                .filter_map(ContentItem::as_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<String> for ContentOption {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ContentOption {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentItem>> for ContentOption {
    fn from(items: Vec<ContentItem>) -> Self {
        Self::Content(items)
    }
}

impl WireEncode for ContentOption {
    fn to_wire(&self, config: &CodecConfig) -> Result<Value> {
        match (self, config.version) {
            (Self::Text(text), _) => Ok(Value::String(text.clone())),
            (Self::Content(_), WireVersion::TextOnly) => Err(Error::UnsupportedEncoding(
                "content arrays require the multimodal wire version".to_string(),
            )),
            (Self::Content(items), WireVersion::Multimodal) => codec::encode_list(items, config),
        }
    }
}

impl WireDecode for ContentOption {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        if config.version == WireVersion::TextOnly {
            return decode_text(value, config);
        }

        Alternatives::new(value, config)
            .or_try("text", decode_text)
            .or_try("content", |value, config| {
                if !value.is_array() {
                    return Err(Error::unexpected(
                        "content",
                        "a string or an array of content items",
                    ));
                }
                codec::decode_list(value, "content", config).map(Self::Content)
            })
            .finish()
            .map_err(|mut failures| match failures.pop() {
                Some((_, err)) => err,
                None => Error::missing("content"),
            })
    }
}

impl_serde_via_wire!(ContentOption);

fn decode_text(value: &Value, _: &CodecConfig) -> Result<ContentOption> {
    value
        .as_str()
        .map(|text| ContentOption::Text(text.to_string()))
        .ok_or_else(|| Error::unexpected("content", "a string"))
}
