//! Response envelopes returned by `/v1/responses`.

use super::output::OutputItem;
use super::tool_output::FunctionCallItem;
use crate::codec::{self, CodecConfig, WireDecode};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: String,
    pub object: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub error: Option<Value>,
    pub incomplete_details: Option<Value>,
    pub instructions: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub model: String,
    pub output: Vec<OutputItem>,
    pub parallel_tool_calls: bool,
    pub previous_response_id: Option<String>,
    pub reasoning: Option<ReasoningSettings>,
    pub store: bool,
    pub temperature: Option<f64>,
    pub text: Option<Value>,
    pub tool_choice: Option<Value>,
    pub tools: Vec<Value>,
    pub top_p: Option<f64>,
    pub truncation: Option<String>,
    pub usage: Option<ResponseUsage>,
    pub user: Option<String>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningSettings {
    #[serde(default)]
    pub effort: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUsage {
    pub input_tokens: u32,
    #[serde(default)]
    pub input_tokens_details: Option<InputTokensDetails>,
    pub output_tokens: u32,
    #[serde(default)]
    pub output_tokens_details: Option<OutputTokensDetails>,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u32,
}

impl Response {
    /// All `output_text` across message items, joined with newlines.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.is_message())
            .filter_map(OutputItem::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Function calls the model is waiting on.
    pub fn function_calls(&self) -> Vec<FunctionCallItem> {
        self.output
            .iter()
            .filter(|item| item.is_function_call())
            .filter_map(|item| {
                Some(FunctionCallItem {
                    id: Some(item.id.clone()),
                    call_id: item.call_id.clone()?,
                    name: item.name.clone()?,
                    arguments: item.arguments.clone().unwrap_or_default(),
                    status: item.status.clone(),
                })
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawResponse {
    id: String,
    #[serde(default)]
    object: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    status: String,
    error: Option<Value>,
    incomplete_details: Option<Value>,
    instructions: Option<String>,
    max_output_tokens: Option<u32>,
    model: String,
    #[serde(default)]
    output: Vec<Value>,
    #[serde(default = "default_true")]
    parallel_tool_calls: bool,
    previous_response_id: Option<String>,
    reasoning: Option<ReasoningSettings>,
    #[serde(default = "default_true")]
    store: bool,
    temperature: Option<f64>,
    text: Option<Value>,
    tool_choice: Option<Value>,
    #[serde(default)]
    tools: Vec<Value>,
    top_p: Option<f64>,
    truncation: Option<String>,
    usage: Option<ResponseUsage>,
    user: Option<String>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

// Both flags default to on server-side when a stored envelope omits them.
fn default_true() -> bool {
    true
}

impl WireDecode for Response {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        let raw = RawResponse::deserialize(value)?;
        let output = raw
            .output
            .iter()
            .map(|item| OutputItem::from_wire(item, config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: raw.id,
            object: raw.object,
            created_at: raw.created_at,
            status: raw.status,
            error: raw.error,
            incomplete_details: raw.incomplete_details,
            instructions: raw.instructions,
            max_output_tokens: raw.max_output_tokens,
            model: raw.model,
            output,
            parallel_tool_calls: raw.parallel_tool_calls,
            previous_response_id: raw.previous_response_id,
            reasoning: raw.reasoning,
            store: raw.store,
            temperature: raw.temperature,
            text: raw.text,
            tool_choice: raw.tool_choice,
            tools: raw.tools,
            top_p: raw.top_p,
            truncation: raw.truncation,
            usage: raw.usage,
            user: raw.user,
            metadata: raw.metadata.unwrap_or_default(),
        })
    }
}

/// One page of stored responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseList {
    pub object: String,
    pub data: Vec<Response>,
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    pub has_more: bool,
}

impl WireDecode for ResponseList {
    fn from_wire(value: &Value, config: &CodecConfig) -> Result<Self> {
        #[derive(Deserialize)]
        struct RawList {
            #[serde(default)]
            object: String,
            data: Value,
            first_id: Option<String>,
            last_id: Option<String>,
            #[serde(default)]
            has_more: bool,
        }

        let raw = RawList::deserialize(value)?;
        Ok(Self {
            object: raw.object,
            data: codec::decode_list(&raw.data, "data", config)?,
            first_id: raw.first_id,
            last_id: raw.last_id,
            has_more: raw.has_more,
        })
    }
}
