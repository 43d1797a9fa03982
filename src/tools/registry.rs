//! Tool registry for managing available tools
//!
//! Holds the descriptors fetched at startup, in provider order, and looks
//! them up by the name the model uses.

use std::collections::HashMap;

use super::provider::{ToolProvider, ToolQuery};
use super::tool::ToolDescriptor;
use crate::core::{AgentError, AgentResult};
use crate::llm::ToolDefinition;

/// Registry that holds all available tools
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from everything a provider returns for `query`
    pub async fn from_provider(provider: &dyn ToolProvider, query: &ToolQuery) -> AgentResult<Self> {
        tracing::info!(
            "[ToolRegistry] Loading tools from provider '{}' (toolkits: {:?}, isolated: {:?}, limit: {})",
            provider.name(),
            query.toolkits,
            query.isolated_tools,
            query.limit
        );

        let mut registry = Self::new();
        for tool in provider.get_tools(query).await? {
            registry.register(tool)?;
        }

        tracing::info!("[ToolRegistry] Registered {} tools", registry.len());
        Ok(registry)
    }

    /// Register a tool
    ///
    /// Returns an error if the name is already taken.
    pub fn register(&mut self, tool: ToolDescriptor) -> AgentResult<()> {
        if self.index.contains_key(&tool.name) {
            return Err(AgentError::InvalidConfig(format!(
                "Tool name conflict: '{}' already exists",
                tool.name
            )));
        }

        tracing::debug!("[ToolRegistry] Registering tool '{}'", tool.name);
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Get all tool definitions for the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::definition).collect()
    }

    /// Get the list of tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
