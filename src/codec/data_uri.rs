//! Packing and unpacking of `data:image/<subtype>;base64,<payload>` URIs.

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = "base64,";

/// An image carried inline, as raw bytes plus its MIME subtype (`png`, `jpeg`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUri {
    pub data: Vec<u8>,
    pub subtype: String,
}

impl ImageDataUri {
    pub fn new(data: Vec<u8>, subtype: impl Into<String>) -> Self {
        Self {
            data,
            subtype: subtype.into(),
        }
    }

    /// Builds an inline image, sniffing the subtype from the magic bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let subtype = detect_image_subtype(&data);
        Self::new(data, subtype)
    }

    pub fn pack(&self) -> String {
        pack(&self.data, &self.subtype)
    }

    pub fn unpack(uri: &str) -> Result<Self> {
        let (data, subtype) = unpack(uri)?;
        Ok(Self { data, subtype })
    }
}

/// Where an `image_url` value points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Inline(ImageDataUri),
}

pub fn pack(data: &[u8], subtype: &str) -> String {
    format!("{IMAGE_PREFIX}{subtype};{BASE64_MARKER}{}", STANDARD.encode(data))
}

/// Splits a data URI into its decoded bytes and image subtype.
///
/// Parameters between the subtype and the `base64,` marker are skipped.
pub fn unpack(uri: &str) -> Result<(Vec<u8>, String)> {
    let rest = uri
        .strip_prefix(IMAGE_PREFIX)
        .ok_or_else(|| Error::MalformedDataUri(format!("expected `{IMAGE_PREFIX}` prefix")))?;

    let semicolon = rest
        .find(';')
        .ok_or_else(|| Error::MalformedDataUri("missing `;` after image subtype".to_string()))?;
    let subtype = &rest[..semicolon];

    let parameters = &rest[semicolon..];
    let marker = parameters
        .find(BASE64_MARKER)
        .ok_or_else(|| Error::MalformedDataUri(format!("missing `{BASE64_MARKER}` marker")))?;
    let payload = &parameters[marker + BASE64_MARKER.len()..];

    let data = STANDARD
        .decode(payload)
        .map_err(|e| Error::MalformedDataUri(format!("invalid base64 payload: {e}")))?;

    Ok((data, subtype.to_string()))
}

/// Decides whether an `image_url` value is a remote reference or inline data.
///
/// `http` and `https` (any case) are remote; everything else must be a
/// well-formed image data URI.
pub fn classify(url: &str) -> Result<ImageSource> {
    if is_remote(url) {
        return Ok(ImageSource::Remote(url.to_string()));
    }
    ImageDataUri::unpack(url).map(ImageSource::Inline)
}

pub(crate) fn is_remote(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, _)) => {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        None => false,
    }
}

pub fn detect_image_subtype(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "png",
        [0x47, 0x49, 0x46, 0x38, ..] => "gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "webp",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to png",
                &bytes[..bytes.len().min(4)]
            );
            "png"
        }
    }
}
