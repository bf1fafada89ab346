use super::{ApiRequest, EventStream, RequestHandler};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records every request and replays queued bodies in order.
#[derive(Clone)]
pub struct MockRequestHandler {
    responses: Arc<Mutex<VecDeque<Result<Vec<u8>>>>>,
    event_streams: Arc<Mutex<VecDeque<Vec<String>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockRequestHandler {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            event_streams: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, body: impl Into<Vec<u8>>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    pub fn with_json(self, body: &serde_json::Value) -> Self {
        self.with_response(body.to_string())
    }

    pub fn with_api_error(self, status: u16, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Err(Error::Api {
            status,
            message: message.into(),
        }));
        self
    }

    /// Queues the payloads one `stream` call will yield.
    pub fn with_events<I, S>(self, payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_streams
            .lock()
            .unwrap()
            .push_back(payloads.into_iter().map(Into::into).collect());
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Body of the most recent request, parsed as JSON.
    pub fn last_body(&self) -> Option<serde_json::Value> {
        let requests = self.requests.lock().unwrap();
        let body = requests.last()?.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record(&self, request: ApiRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

impl Default for MockRequestHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestHandler for MockRequestHandler {
    async fn perform(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let path = request.path.clone();
        self.record(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(Error::Api {
                    status: 404,
                    message: format!("no mock response queued for {path}"),
                })
            })
    }

    async fn stream(&self, request: ApiRequest) -> Result<EventStream> {
        self.record(request);
        let payloads = self
            .event_streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Ok(Box::pin(futures_util::stream::iter(
            payloads.into_iter().map(Ok),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_responses_in_order() {
        let mock = MockRequestHandler::new()
            .with_response("first")
            .with_json(&json!({ "second": true }));

        assert_eq!(mock.perform(ApiRequest::get("/a")).await.unwrap(), b"first");
        assert_eq!(
            mock.perform(ApiRequest::get("/b")).await.unwrap(),
            br#"{"second":true}"#
        );
        assert!(matches!(
            mock.perform(ApiRequest::get("/c")).await,
            Err(Error::Api { status: 404, .. })
        ));
        assert_eq!(mock.get_call_count(), 3);
        assert_eq!(mock.requests()[1].path, "/b");
    }

    #[tokio::test]
    async fn test_records_request_bodies() {
        let mock = MockRequestHandler::new().with_response("{}");
        mock.perform(ApiRequest::post("/v1/x", br#"{"model":"m"}"#.to_vec()))
            .await
            .unwrap();

        assert_eq!(mock.last_body(), Some(json!({ "model": "m" })));
    }

    #[tokio::test]
    async fn test_streams_queued_events() {
        let mock = MockRequestHandler::new().with_events(["a", "b"]);
        let events: Vec<_> = mock
            .stream(ApiRequest::get("/s"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap(), "a");
    }
}
