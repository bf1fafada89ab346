//! Chat completions: messages, their content, and the completion envelopes.

pub mod completion;
pub mod content;
pub mod message;
pub mod provider;
pub mod request;
pub mod tool_call;

pub use completion::{
    Chat, ChatChunk, ChatDelta, Choice, ChunkChoice, FinishReason, FunctionDelta, ToolCallDelta,
    Usage,
};
pub use content::{ContentItem, ContentOption};
pub use message::{AssistantContent, ChatMessage};
pub use provider::{ChatProvider, ChunkStream};
pub use request::{ChatResponseFormat, CreateChatRequest};
pub use tool_call::{FunctionCall, ToolCall};
