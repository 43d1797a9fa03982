//! Turn executor interface
//!
//! The executor is the conversational runtime. Each call to `stream` is one
//! pass: it yields content updates and, possibly, interrupts, then ends.

use futures::stream::Stream;
use std::pin::Pin;

use crate::core::AgentResult;
use crate::interrupt::{Interrupt, ResumeValue};
use crate::llm::ChatMessage;

/// Input for one pass
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInput {
    /// A fresh user message
    Message(String),
    /// Decisions for the interrupts raised by the previous pass
    Resume(ResumeValue),
}

impl TurnInput {
    /// Create a user message input
    pub fn message(text: impl Into<String>) -> Self {
        TurnInput::Message(text.into())
    }
}

/// Conversation key threaded through every pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
}

impl SessionContext {
    /// Create a session context
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// Messages produced by one named step of the runtime
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateGroup {
    /// Step that produced the messages (e.g. "model", "tools")
    pub node: String,
    pub messages: Vec<ChatMessage>,
}

impl UpdateGroup {
    /// Create an update group
    pub fn new(node: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            node: node.into(),
            messages,
        }
    }
}

/// One event of a pass
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// Content to show the user
    Updates(Vec<UpdateGroup>),
    /// Suspension requests that must be resolved before resuming
    Interrupts(Vec<Interrupt>),
}

/// Lazily produced events of one pass
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = AgentResult<TurnEvent>> + Send + 'a>>;

/// Conversational runtime driven pass by pass
pub trait TurnExecutor: Send + Sync {
    /// Start a pass
    ///
    /// Errors surface as stream items; the first one aborts the turn.
    fn stream<'a>(&'a self, input: TurnInput, session: &'a SessionContext) -> EventStream<'a>;
}
