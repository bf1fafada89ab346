//! The responses API: heterogeneous input items in, output items back.

pub mod content;
pub mod input;
pub mod output;
pub mod provider;
pub mod request;
pub mod response;
pub mod tool_output;

pub use content::ResponseContentItem;
pub use input::{InputMessage, InputRole, ReasoningItem, ResponseInput, ResponseInputItem};
pub use output::{OutputContent, OutputItem};
pub use provider::{ListParams, ResponseProvider};
pub use request::{CreateResponseRequest, ReasoningEffort, ResponseTextFormat};
pub use response::{
    InputTokensDetails, OutputTokensDetails, ReasoningSettings, Response, ResponseList,
    ResponseUsage,
};
pub use tool_output::{FunctionCallItem, ToolOutput};
