//! Tool Backend trait
//!
//! The executor authorizes and runs tools through this seam.

use async_trait::async_trait;
use serde_json::Value;

use super::tool::{ToolDescriptor, ToolResult};
use crate::core::AgentResult;
use crate::interrupt::AuthorizationHandle;

/// Outcome of asking the backend to authorize a tool for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The user already granted access
    Completed,
    /// The user must visit the handle's URL first
    Pending(AuthorizationHandle),
}

#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Start (or confirm) authorization of `tool` for `user_id`
    async fn authorize(&self, tool: &ToolDescriptor, user_id: &str) -> AgentResult<AuthorizationStatus>;

    /// Run `tool` with `input` on behalf of `user_id`
    ///
    /// A tool that ran and failed is an `Ok` error result; `Err` means the
    /// backend itself could not be reached or answered badly.
    async fn execute(&self, tool: &ToolDescriptor, input: &Value, user_id: &str) -> AgentResult<ToolResult>;
}
