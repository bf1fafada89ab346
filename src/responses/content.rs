//! Content parts of a responses-API input message.

use crate::codec::data_uri::{self, ImageDataUri, ImageSource};
use crate::codec::{self, impl_serde_via_wire, CodecConfig, WireDecode, WireEncode};
use crate::{Error, Result};
use serde_json::{json, Map, Value};

/// One part of an input message.
///
/// `OutputText` marks text the model produced earlier and is being
/// replayed; fresh caller text is `InputText`. The API only accepts each
/// in its own position (see [`super::InputRole`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseContentItem {
    InputText(String),
    InputImageUrl(String),
    InputImage { data: Vec<u8>, subtype: String },
    /// Image previously uploaded through the files API.
    InputImageFile(String),
    InputFile(String),
    OutputText(String),
}

impl ResponseContentItem {
    pub fn input_text(text: impl Into<String>) -> Self {
        Self::InputText(text.into())
    }

    pub fn output_text(text: impl Into<String>) -> Self {
        Self::OutputText(text.into())
    }

    pub fn image_bytes(data: Vec<u8>) -> Self {
        let ImageDataUri { data, subtype } = ImageDataUri::from_bytes(data);
        Self::InputImage { data, subtype }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::InputText(_) => "input_text",
            Self::InputImageUrl(_) | Self::InputImage { .. } | Self::InputImageFile(_) => {
                "input_image"
            }
            Self::InputFile(_) => "input_file",
            Self::OutputText(_) => "output_text",
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Self::OutputText(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::InputText(text) | Self::OutputText(text) => Some(text),
            _ => None,
        }
    }
}

impl WireEncode for ResponseContentItem {
    fn to_wire(&self, _: &CodecConfig) -> Result<Value> {
        let tag = self.type_tag();
        Ok(match self {
            Self::InputText(text) => json!({ "type": tag, "text": text }),
            Self::InputImageUrl(url) => json!({ "type": tag, "image_url": url }),
            Self::InputImage { data, subtype } => {
                json!({ "type": tag, "image_url": data_uri::pack(data, subtype) })
            }
            Self::InputImageFile(file_id) | Self::InputFile(file_id) => {
                json!({ "type": tag, "file_id": file_id })
            }
            Self::OutputText(text) => json!({ "type": tag, "text": text, "annotations": [] }),
        })
    }
}

impl WireDecode for ResponseContentItem {
    fn from_wire(value: &Value, _: &CodecConfig) -> Result<Self> {
        let object = codec::as_object(value, "content[]")?;
        match codec::required_str(object, "type")? {
            "input_text" => Ok(Self::InputText(text_field(object, "text")?)),
            "output_text" => Ok(Self::OutputText(text_field(object, "text")?)),
            "input_file" => Ok(Self::InputFile(text_field(object, "file_id")?)),
            "input_image" => {
                if let Some(file_id) = codec::optional_str(object, "file_id")? {
                    return Ok(Self::InputImageFile(file_id.to_string()));
                }
                let url = codec::optional_str(object, "image_url")?
                    .ok_or_else(|| Error::missing("image_url"))?;
                Ok(match data_uri::classify(url)? {
                    ImageSource::Remote(url) => Self::InputImageUrl(url),
                    ImageSource::Inline(ImageDataUri { data, subtype }) => {
                        Self::InputImage { data, subtype }
                    }
                })
            }
            other => Err(Error::UnknownContentType(other.to_string())),
        }
    }
}

impl_serde_via_wire!(ResponseContentItem);

fn text_field(object: &Map<String, Value>, name: &str) -> Result<String> {
    Ok(codec::required_str(object, name)?.to_string())
}
