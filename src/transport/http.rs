use super::config::Configuration;
use super::{ApiRequest, EventStream, HttpMethod, RequestHandler};
use crate::{Error, Result};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// [`RequestHandler`] over a reqwest client.
pub struct HttpRequestHandler {
    client: Client,
    configuration: Configuration,
    timeout: Duration,
}

impl HttpRequestHandler {
    pub fn new(configuration: Configuration, timeout: Duration) -> Result<Self> {
        let client = Client::builder().connect_timeout(timeout).build()?;
        Ok(Self::with_client(client, configuration, timeout))
    }

    pub fn with_client(client: Client, configuration: Configuration, timeout: Duration) -> Self {
        Self {
            client,
            configuration,
            timeout,
        }
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder> {
        let url = self.configuration.generate_url(request)?;
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        }
        .bearer_auth(&self.configuration.api_key);

        if let Some(organization) = &self.configuration.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        Ok(builder)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response> {
        tracing::debug!(path, "Sending API request");
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to {}: {}", path, e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("API error (status {}): {}", status, error_text);
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl RequestHandler for HttpRequestHandler {
    async fn perform(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let builder = self.build(&request)?.timeout(self.timeout);
        let response = self.send(builder, &request.path).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn stream(&self, request: ApiRequest) -> Result<EventStream> {
        let builder = self.build(&request)?.header("Accept", "text/event-stream");
        let response = self.send(builder, &request.path).await?;
        let mut body = response.bytes_stream().eventsource();

        let events = async_stream::stream! {
            while let Some(event) = body.next().await {
                match event {
                    Ok(event) if event.data.trim() == "[DONE]" => break,
                    Ok(event) => yield Ok(event.data),
                    Err(e) => {
                        tracing::error!("Event stream interrupted: {}", e);
                        yield Err(Error::Stream(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(events))
    }
}

/// Pulls `error.message` out of an OpenAI error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
