use crate::chat::ChatProvider;
use crate::codec::CodecConfig;
use crate::embedding::EmbeddingProvider;
use crate::responses::ResponseProvider;
use crate::transport::{Configuration, HttpRequestHandler, RequestHandler};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Entry point bundling every provider over one request handler.
#[derive(Clone)]
pub struct Client {
    pub chats: ChatProvider,
    pub responses: ResponseProvider,
    pub embeddings: EmbeddingProvider,
}

impl Client {
    pub fn new(configuration: Configuration) -> Result<Self> {
        let handler = HttpRequestHandler::new(configuration, DEFAULT_TIMEOUT)?;
        Ok(Self::with_handler(Arc::new(handler), CodecConfig::default()))
    }

    /// Builds a client from `OPENAI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Configuration::from_env()?)
    }

    pub fn with_handler(handler: Arc<dyn RequestHandler>, codec: CodecConfig) -> Self {
        Self {
            chats: ChatProvider::new(handler.clone(), codec),
            responses: ResponseProvider::new(handler.clone(), codec),
            embeddings: EmbeddingProvider::new(handler, codec),
        }
    }
}
