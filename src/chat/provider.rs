use super::completion::{Chat, ChatChunk};
use super::request::CreateChatRequest;
use crate::codec::{CodecConfig, WireDecode};
use crate::transport::{ApiRequest, RequestHandler};
use crate::{Error, Result};
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>;

/// `/v1/chat/completions`, whole or streamed.
#[derive(Clone)]
pub struct ChatProvider {
    handler: Arc<dyn RequestHandler>,
    codec: CodecConfig,
}

impl ChatProvider {
    pub fn new(handler: Arc<dyn RequestHandler>, codec: CodecConfig) -> Self {
        Self { handler, codec }
    }

    pub async fn create(&self, request: &CreateChatRequest) -> Result<Chat> {
        let body = self.codec.to_bytes(&request.to_body(&self.codec, false)?)?;
        let bytes = self
            .handler
            .perform(ApiRequest::post(COMPLETIONS_PATH, body))
            .await?;
        Chat::from_slice(&bytes, &self.codec)
    }

    /// Streams completion chunks. A chunk that fails to decode is yielded
    /// as an error and the stream carries on.
    pub async fn stream(&self, request: &CreateChatRequest) -> Result<ChunkStream> {
        let body = self.codec.to_bytes(&request.to_body(&self.codec, true)?)?;
        let events = self
            .handler
            .stream(ApiRequest::post(COMPLETIONS_PATH, body))
            .await?;

        let chunks = events.map(|event| {
            let payload = event?;
            serde_json::from_str::<ChatChunk>(&payload).map_err(|e| {
                tracing::warn!("Skipping undecodable chat chunk: {}", e);
                Error::from(e)
            })
        });
        Ok(Box::pin(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use crate::transport::{HttpMethod, MockRequestHandler};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn provider(mock: &MockRequestHandler) -> ChatProvider {
        ChatProvider::new(Arc::new(mock.clone()), CodecConfig::default())
    }

    fn chunk(content: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [{ "index": 0, "delta": { "content": content }, "finish_reason": null }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_posts_messages_and_decodes_chat() {
        let mock = MockRequestHandler::new().with_json(&json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Paris" },
                "finish_reason": "stop"
            }]
        }));

        let request =
            CreateChatRequest::new("gpt-4o", vec![ChatMessage::user("Capital of France?")]);
        let chat = provider(&mock).create(&request).await.unwrap();

        assert_eq!(chat.first_text().as_deref(), Some("Paris"));
        let sent = &mock.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.path, "/v1/chat/completions");
        assert_eq!(
            mock.last_body().unwrap()["messages"],
            json!([{ "role": "user", "content": "Capital of France?" }])
        );
    }

    #[tokio::test]
    async fn test_create_surfaces_decode_errors() {
        let mock = MockRequestHandler::new().with_response("{\"id\": 1}");
        let request = CreateChatRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        let err = provider(&mock).create(&request).await.unwrap_err();
        assert!(err.is_codec_error());
    }

    #[tokio::test]
    async fn test_stream_continues_past_bad_chunk() {
        let mock = MockRequestHandler::new().with_events([
            chunk("Hel"),
            "{not json".to_string(),
            chunk("lo"),
        ]);
        let request = CreateChatRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);

        let results: Vec<Result<ChatChunk>> = provider(&mock)
            .stream(&request)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().delta_text(), Some("Hel"));
        assert!(matches!(results[1], Err(Error::Serialization(_))));
        assert_eq!(results[2].as_ref().unwrap().delta_text(), Some("lo"));
        assert_eq!(mock.last_body().unwrap()["stream"], json!(true));
    }
}
