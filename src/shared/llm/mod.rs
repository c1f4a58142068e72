mod client;

pub use client::{ChatCompletionRequest, ChatMessage, LlmClient, LlmError, OpenAiChatClient};
