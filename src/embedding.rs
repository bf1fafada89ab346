//! Embeddings over `/v1/embeddings`.

use crate::codec::CodecConfig;
use crate::transport::{ApiRequest, RequestHandler};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const EMBEDDINGS_PATH: &str = "/v1/embeddings";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
    pub encoding_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub object: String,
    pub data: Vec<Embedding>,
    #[serde(default)]
    pub model: String,
    pub usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Embedding {
    pub index: usize,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EmbeddingUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Clone)]
pub struct EmbeddingProvider {
    handler: Arc<dyn RequestHandler>,
    codec: CodecConfig,
}

impl EmbeddingProvider {
    pub fn new(handler: Arc<dyn RequestHandler>, codec: CodecConfig) -> Self {
        Self { handler, codec }
    }

    /// Embeds `input`, returning one response whose `data` is in input order.
    pub async fn create(
        &self,
        model: &str,
        input: &[&str],
        user: Option<&str>,
    ) -> Result<EmbeddingResponse> {
        let request = EmbeddingRequest {
            model: model.to_string(),
            input: input.iter().map(|text| (*text).to_string()).collect(),
            // Raw floats, not base64, so `embedding` decodes straight into Vec<f32>.
            encoding_format: "float".to_string(),
            user: user.map(str::to_string),
        };
        let body = self.codec.to_bytes(&serde_json::to_value(&request)?)?;

        let bytes = self
            .handler
            .perform(ApiRequest::post(EMBEDDINGS_PATH, body))
            .await?;
        let mut response: EmbeddingResponse = serde_json::from_slice(&bytes)?;

        response.data.sort_by_key(|item| item.index);

        let contiguous = response
            .data
            .iter()
            .enumerate()
            .all(|(expected, item)| item.index == expected);
        if response.data.len() != input.len() || !contiguous {
            tracing::error!(
                "Expected {} embeddings indexed from 0, got {}",
                input.len(),
                response.data.len()
            );
            return Err(Error::UnexpectedType {
                field: "data".to_string(),
                expected: "one embedding per input, indexed from 0",
            });
        }

        Ok(response)
    }
}
