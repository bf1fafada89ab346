use super::request::CreateResponseRequest;
use super::response::{Response, ResponseList};
use crate::codec::{CodecConfig, WireDecode, WireEncode};
use crate::transport::{resource_path, ApiRequest, RequestHandler};
use crate::Result;
use std::sync::Arc;

const RESPONSES_PATH: &str = "/v1/responses";

/// Paging parameters for [`ResponseProvider::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// `/v1/responses`: create, retrieve and list.
#[derive(Clone)]
pub struct ResponseProvider {
    handler: Arc<dyn RequestHandler>,
    codec: CodecConfig,
}

impl ResponseProvider {
    pub fn new(handler: Arc<dyn RequestHandler>, codec: CodecConfig) -> Self {
        Self { handler, codec }
    }

    pub async fn create(&self, request: &CreateResponseRequest) -> Result<Response> {
        let body = request.to_bytes(&self.codec)?;
        let bytes = self
            .handler
            .perform(ApiRequest::post(RESPONSES_PATH, body))
            .await?;
        Response::from_slice(&bytes, &self.codec)
    }

    pub async fn retrieve(&self, id: &str) -> Result<Response> {
        let path = resource_path(RESPONSES_PATH, id)?;
        let bytes = self.handler.perform(ApiRequest::get(path)).await?;
        Response::from_slice(&bytes, &self.codec)
    }

    pub async fn list(&self, params: &ListParams) -> Result<ResponseList> {
        let mut request = ApiRequest::get(RESPONSES_PATH);
        if let Some(limit) = params.limit {
            request = request.with_query("limit", limit);
        }
        if let Some(before) = &params.before {
            request = request.with_query("before", before);
        }
        if let Some(after) = &params.after {
            request = request.with_query("after", after);
        }

        let bytes = self.handler.perform(request).await?;
        ResponseList::from_slice(&bytes, &self.codec)
    }
}
