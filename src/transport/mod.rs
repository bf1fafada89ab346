//! The HTTP side of the client: what a request looks like, and the trait
//! that carries it.
//!
//! Providers only build [`ApiRequest`]s and decode the bytes that come
//! back, so the codec can be exercised against [`MockRequestHandler`]
//! without a network.

pub mod config;
pub mod http;
pub mod mock;

use crate::{Error, Result};
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

pub use config::{Api, Configuration, Scheme};
pub use http::HttpRequestHandler;
pub use mock::MockRequestHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the API root, e.g. `/v1/chat/completions`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Encoded JSON body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Joins a collection path and a caller-supplied id, escaping the id so it
/// stays one path segment.
pub fn resource_path(collection: &str, id: &str) -> Result<String> {
    if id.is_empty() || id.trim_matches('.').is_empty() {
        return Err(Error::InvalidUrl(format!("`{id}` is not a usable resource id")));
    }
    Ok(format!("{collection}/{}", urlencoding::encode(id)))
}

/// Payloads of server-sent events, one JSON document per item.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Sends the request and returns the raw response body.
    async fn perform(&self, request: ApiRequest) -> Result<Vec<u8>>;

    /// Sends the request and yields each event payload until `[DONE]`.
    async fn stream(&self, request: ApiRequest) -> Result<EventStream>;
}
