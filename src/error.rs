//! Error handling and custom error types
//!
//! One error type covers the whole crate: wire-shape failures raised by the
//! codec, and transport failures raised by the request handlers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed image data URI: {0}")]
    MalformedDataUri(String),

    #[error("Missing required field `{0}`")]
    MissingField(String),

    #[error("Field `{field}` has the wrong type, expected {expected}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
    },

    #[error("Unknown content type `{0}`")]
    UnknownContentType(String),

    #[error("Invalid role `{0}`")]
    InvalidRole(String),

    #[error("No input item shape matched (type: {tag}): {attempts}")]
    NoMatchingInputItemShape { tag: String, attempts: String },

    #[error("Content type `{content_type}` is not allowed in a `{role}` message")]
    MisplacedContent { role: String, content_type: String },

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Event stream error: {0}")]
    Stream(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn missing(field: &str) -> Self {
        Error::MissingField(field.to_string())
    }

    pub(crate) fn unexpected(field: &str, expected: &'static str) -> Self {
        Error::UnexpectedType {
            field: field.to_string(),
            expected,
        }
    }

    /// Returns true for errors describing the shape of a JSON payload rather
    /// than the transport that carried it.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedDataUri(_)
                | Error::MissingField(_)
                | Error::UnexpectedType { .. }
                | Error::UnknownContentType(_)
                | Error::InvalidRole(_)
                | Error::NoMatchingInputItemShape { .. }
                | Error::MisplacedContent { .. }
                | Error::UnsupportedEncoding(_)
                | Error::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
