//! LLM Provider trait
//!
//! Abstracts the chat model so the executor can be driven by any backend
//! (or by a scripted fake in tests).

use anyhow::Result;

use super::types::{ChatMessage, ToolDefinition};

/// Trait for chat models that support tool calling
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the conversation and available tools, returning the assistant message
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage>;

    /// Get the current model name
    fn model(&self) -> &str;
}
