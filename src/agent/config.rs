//! Agent Configuration
//!
//! Configuration options for the ToolCallingExecutor.

use std::sync::Arc;

use super::prompt::DEFAULT_SYSTEM_PROMPT;
use crate::core::{AgentResult, AppConfig};
use crate::llm::ToolDefinition;
use crate::permissions::ApprovalPolicy;
use crate::tools::ToolRegistry;

/// Configuration for a ToolCallingExecutor
///
/// Use the builder pattern to configure the agent:
///
/// ```ignore
/// let config = AgentConfig::new("You are a helpful assistant")
///     .with_user_id("me@example.com")
///     .with_tools(tools)
///     .with_approval_policy(policy)
///     .with_max_steps(10);
/// ```
pub struct AgentConfig {
    /// System prompt for the LLM
    pub system_prompt: String,

    /// Identity tools are authorized and executed for
    pub user_id: String,

    /// Tools offered to the model
    pub tools: Arc<ToolRegistry>,

    /// Which tool calls need a human yes/no first
    pub approval: ApprovalPolicy,

    /// Maximum number of model calls per pass (prevents infinite loops)
    pub max_steps: usize,
}

impl AgentConfig {
    /// Create a new agent configuration with a system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_id: String::new(),
            tools: Arc::new(ToolRegistry::new()),
            approval: ApprovalPolicy::none(),
            max_steps: 25,
        }
    }

    /// Build the configuration described by the application settings
    pub fn from_app_config(config: &AppConfig, tools: Arc<ToolRegistry>) -> AgentResult<Self> {
        Ok(Self::new(config.system_prompt.clone())
            .with_user_id(config.user_id.clone())
            .with_tools(tools)
            .with_approval_policy(ApprovalPolicy::from_tool_names(&config.approval_tools)?)
            .with_max_steps(config.max_steps))
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Set the tool registry
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_approval_policy(mut self, policy: ApprovalPolicy) -> Self {
        self.approval = policy;
        self
    }

    /// Set maximum model calls per pass
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    /// Get tool definitions for the model
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("system_prompt", &format!("{}...", &self.system_prompt.chars().take(50).collect::<String>()))
            .field("user_id", &self.user_id)
            .field("tools", &self.tools.tool_names())
            .field("approval_rules", &self.approval.rules().len())
            .field("max_steps", &self.max_steps)
            .finish()
    }
}
