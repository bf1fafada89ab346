//! Typed client and wire codec for OpenAI-style chat and responses APIs
//!
//! The codec turns conversations (chat messages, or the heterogeneous input
//! items of the responses API) into JSON documents and back, tolerating the
//! plain-string and structured-array shapes the API uses for content.
//! Providers send those documents through a pluggable [`transport::RequestHandler`].

pub mod chat;
pub mod client;
pub mod codec;
pub mod embedding;
pub mod error;
pub mod responses;
pub mod tool;
pub mod transport;

pub use client::Client;
pub use codec::{CodecConfig, WireDecode, WireEncode, WireVersion};
pub use error::{Error, Result};
