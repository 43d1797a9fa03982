//! In-memory conversation checkpoints
//!
//! One checkpoint per session id: the message history plus, while a step is
//! suspended, the tool calls still waiting on decisions.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::llm::{ChatMessage, ToolCall};

/// What a suspended tool call is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    Authorization,
    Approval,
}

/// A tool call parked until the user decides on it
#[derive(Debug, Clone)]
pub struct SuspendedCall {
    /// Position of the call in the assistant message
    pub index: usize,
    pub call: ToolCall,
    pub reason: Suspension,
}

/// A model step whose tool calls are not all resolved yet
#[derive(Debug, Clone, Default)]
pub struct PendingStep {
    /// One slot per tool call of the step, filled once its result exists
    pub results: Vec<Option<ChatMessage>>,
    /// Calls awaiting decisions, in interrupt order
    pub suspended: Vec<SuspendedCall>,
}

impl PendingStep {
    pub fn new(call_count: usize) -> Self {
        Self {
            results: vec![None; call_count],
            suspended: Vec::new(),
        }
    }

    /// Tool messages in call order, once every slot is filled
    pub fn into_messages(self) -> Option<Vec<ChatMessage>> {
        self.results.into_iter().collect()
    }

    /// Close every suspended call with `reason` and return all tool messages
    pub fn cancel(mut self, reason: &str) -> Vec<ChatMessage> {
        for parked in std::mem::take(&mut self.suspended) {
            self.results[parked.index] = Some(ChatMessage::tool(
                parked.call.id,
                parked.call.function.name,
                reason,
            ));
        }
        self.results.into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Checkpoint {
    pub history: Vec<ChatMessage>,
    pub pending: Option<PendingStep>,
}

/// Checkpoints keyed by session id, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryCheckpointer {
    threads: Mutex<HashMap<String, Checkpoint>>,
}

impl MemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current checkpoint for `session_id` (empty if none)
    pub async fn load(&self, session_id: &str) -> Checkpoint {
        self.threads
            .lock()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn save(&self, session_id: &str, checkpoint: Checkpoint) {
        tracing::debug!(
            "[Checkpoint] Saving session '{}' ({} messages, pending: {})",
            session_id,
            checkpoint.history.len(),
            checkpoint.pending.is_some()
        );
        self.threads
            .lock()
            .await
            .insert(session_id.to_string(), checkpoint);
    }
}
