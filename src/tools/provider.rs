//! Tool Provider trait
//!
//! Abstraction for the service that hands out tool descriptors.

use async_trait::async_trait;

use super::tool::ToolDescriptor;
use crate::core::{AgentResult, AppConfig};

/// Which tools to fetch, and for whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolQuery {
    /// Identity the tools will be authorized and executed for
    pub user_id: String,
    /// Toolkits whose tools are all included
    pub toolkits: Vec<String>,
    /// Individual tools included on top of the toolkits
    pub isolated_tools: Vec<String>,
    /// Maximum number of descriptors returned
    pub limit: usize,
}

impl ToolQuery {
    /// Build the query described by the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            user_id: config.user_id.clone(),
            toolkits: config.toolkits.clone(),
            isolated_tools: config.isolated_tools.clone(),
            limit: config.tool_limit,
        }
    }
}

/// Trait for tool sources
///
/// Called once at startup; a failure there is fatal.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Fetch the descriptors matching `query`
    async fn get_tools(&self, query: &ToolQuery) -> AgentResult<Vec<ToolDescriptor>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &str;
}
