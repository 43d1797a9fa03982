//! Conversational runtime
//!
//! `ToolCallingExecutor` implements `TurnExecutor` on top of a chat model
//! and a tool backend, raising interrupts for authorization and approval.

mod checkpoint;
mod config;
mod executor;
mod prompt;

pub use checkpoint::{Checkpoint, MemoryCheckpointer, PendingStep, SuspendedCall, Suspension};
pub use config::AgentConfig;
pub use executor::{ToolCallingExecutor, MODEL_NODE, TOOLS_NODE};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
