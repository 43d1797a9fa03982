//! Tool system
//!
//! This module provides:
//! - `ToolDescriptor` - A remote tool as the model sees it
//! - `ToolResult` - Result type for tool execution
//! - `ToolProvider` trait - Interface for the tool source
//! - `ToolBackend` trait - Interface for authorizing and running tools
//! - `ToolRegistry` - Registry of the tools fetched at startup

mod backend;
mod provider;
mod registry;
mod tool;

pub use backend::{AuthorizationStatus, ToolBackend};
pub use provider::{ToolProvider, ToolQuery};
pub use registry::ToolRegistry;
pub use tool::{ToolDescriptor, ToolResult};
