//! Tool-calling executor
//!
//! A `TurnExecutor` that alternates model calls and tool calls. Before a
//! tool runs it is gated: tools needing a third-party grant are authorized
//! through the backend, tools matched by the approval policy wait for the
//! user. Either gate suspends the step and ends the pass with interrupts;
//! the next pass resumes it with the user's decisions.
//!
//! The checkpoint is saved whenever a step's tool calls have all run, so a
//! later failure in the same pass never forgets a call that already
//! reached the backend.

use std::sync::Arc;

use async_stream::try_stream;
use uuid::Uuid;

use super::checkpoint::{MemoryCheckpointer, PendingStep, SuspendedCall, Suspension};
use super::config::AgentConfig;
use crate::core::{AgentError, AgentResult};
use crate::interrupt::{Interrupt, InterruptKind, ResumeValue};
use crate::llm::{ChatMessage, LlmProvider, ToolCall, ToolDefinition};
use crate::tools::{AuthorizationStatus, ToolBackend, ToolResult};
use crate::turn::{EventStream, SessionContext, TurnEvent, TurnExecutor, TurnInput, UpdateGroup};

/// Update group name for model replies
pub const MODEL_NODE: &str = "model";
/// Update group name for tool results
pub const TOOLS_NODE: &str = "tools";

const CANCELLED: &str = "The tool call was cancelled because the user sent a new message.";

/// Gates a call has already passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clearance {
    None,
    Authorized,
    Approved,
}

enum Gate {
    Done(ChatMessage),
    Suspended(Suspension, Interrupt),
}

/// Outcome of working through one step's tool calls
enum StepOutcome {
    Completed(Vec<ChatMessage>),
    Suspended(PendingStep, Vec<Interrupt>),
}

/// Executor backed by a chat model and a tool backend
///
/// History lives in memory, keyed by session id.
pub struct ToolCallingExecutor {
    config: AgentConfig,
    llm: Arc<dyn LlmProvider>,
    backend: Arc<dyn ToolBackend>,
    checkpoints: MemoryCheckpointer,
}

impl ToolCallingExecutor {
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmProvider>, backend: Arc<dyn ToolBackend>) -> Self {
        tracing::info!(
            "[Executor] Model {} with {} tools, max {} steps per pass",
            llm.model(),
            config.tools.len(),
            config.max_steps
        );
        Self {
            config,
            llm,
            backend,
            checkpoints: MemoryCheckpointer::new(),
        }
    }

    /// Call the model, counting against the per-pass step limit
    async fn next_reply(
        &self,
        history: &[ChatMessage],
        tools: &[ToolDefinition],
        steps: &mut usize,
    ) -> AgentResult<ChatMessage> {
        if *steps >= self.config.max_steps {
            tracing::warn!("[Executor] Max steps ({}) reached", self.config.max_steps);
            return Err(AgentError::executor(format!(
                "Stopped after {} model calls without a final answer",
                self.config.max_steps
            )));
        }
        *steps += 1;

        tracing::info!(
            "[Executor] Calling model with {} messages (step {})",
            history.len(),
            steps
        );

        self.llm
            .complete(history, tools)
            .await
            .map_err(|e| match e.downcast::<AgentError>() {
                Ok(agent_error) => agent_error,
                Err(other) => AgentError::executor(format!("{:#}", other)),
            })
    }

    /// Decide what happens to one tool call
    async fn gate(&self, call: &ToolCall, clearance: Clearance) -> AgentResult<Gate> {
        let name = call.function.name.as_str();

        let Some(tool) = self.config.tools.get(name) else {
            tracing::warn!("[Executor] Model called unknown tool {}", name);
            return Ok(Gate::Done(tool_message(
                call,
                ToolResult::error(format!("Tool {} not found", name)),
            )));
        };

        let input = match call.parsed_arguments() {
            Ok(input) => input,
            Err(e) => {
                return Ok(Gate::Done(tool_message(
                    call,
                    ToolResult::error(format!("Invalid arguments for {}: {}", name, e)),
                )))
            }
        };

        if clearance == Clearance::None && tool.requires_authorization {
            if let AuthorizationStatus::Pending(handle) =
                self.backend.authorize(tool, &self.config.user_id).await?
            {
                tracing::info!("[Executor] {} needs authorization", name);
                let interrupt = Interrupt {
                    id: new_interrupt_id(),
                    kind: InterruptKind::Authorization {
                        tool_name: name.to_string(),
                        handle,
                    },
                };
                return Ok(Gate::Suspended(Suspension::Authorization, interrupt));
            }
        }

        if clearance != Clearance::Approved && self.config.approval.requires_approval(name) {
            tracing::info!("[Executor] {} needs approval", name);
            let interrupt = Interrupt::approval(new_interrupt_id(), name, input);
            return Ok(Gate::Suspended(Suspension::Approval, interrupt));
        }

        let result = match self.backend.execute(tool, &input, &self.config.user_id).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("[Executor] {} failed: {}", name, e);
                ToolResult::error(e.to_string())
            }
        };
        Ok(Gate::Done(tool_message(call, result)))
    }

    /// Gate every call of a fresh model step
    async fn process_calls(&self, calls: &[ToolCall]) -> AgentResult<StepOutcome> {
        let mut step = PendingStep::new(calls.len());
        let mut interrupts = Vec::new();

        for (index, call) in calls.iter().enumerate() {
            tracing::info!("[Executor] Tool call: {} ({})", call.function.name, call.id);
            match self.gate(call, Clearance::None).await? {
                Gate::Done(message) => step.results[index] = Some(message),
                Gate::Suspended(reason, interrupt) => {
                    step.suspended.push(SuspendedCall {
                        index,
                        call: call.clone(),
                        reason,
                    });
                    interrupts.push(interrupt);
                }
            }
        }

        finish(step, interrupts)
    }

    /// Apply decisions to a suspended step
    async fn resume(&self, mut step: PendingStep, value: ResumeValue) -> AgentResult<StepOutcome> {
        let decisions = value.into_decisions();
        if decisions.len() != step.suspended.len() {
            return Err(AgentError::executor(format!(
                "Expected {} decisions, got {}",
                step.suspended.len(),
                decisions.len()
            )));
        }

        let parked_calls = std::mem::take(&mut step.suspended);
        let mut interrupts = Vec::new();

        for (parked, decision) in parked_calls.into_iter().zip(decisions) {
            let name = parked.call.function.name.clone();

            if !decision.authorized {
                tracing::info!("[Executor] User declined {}", name);
                step.results[parked.index] = Some(ChatMessage::tool(
                    parked.call.id.clone(),
                    name.clone(),
                    format!("The user did not authorize the {} tool call.", name),
                ));
                continue;
            }

            let clearance = match parked.reason {
                Suspension::Authorization => Clearance::Authorized,
                Suspension::Approval => Clearance::Approved,
            };
            match self.gate(&parked.call, clearance).await? {
                Gate::Done(message) => step.results[parked.index] = Some(message),
                Gate::Suspended(reason, interrupt) => {
                    step.suspended.push(SuspendedCall { reason, ..parked });
                    interrupts.push(interrupt);
                }
            }
        }

        finish(step, interrupts)
    }
}

impl TurnExecutor for ToolCallingExecutor {
    fn stream<'a>(&'a self, input: TurnInput, session: &'a SessionContext) -> EventStream<'a> {
        let stream = try_stream! {
            let session_id = session.session_id.as_str();
            let mut checkpoint = self.checkpoints.load(session_id).await;
            if checkpoint.history.is_empty() {
                checkpoint.history.push(ChatMessage::system(self.config.system_prompt.clone()));
            }

            match input {
                TurnInput::Message(text) => {
                    if let Some(step) = checkpoint.pending.take() {
                        tracing::warn!("[Executor] New message while tool calls were suspended, cancelling them");
                        checkpoint.history.extend(step.cancel(CANCELLED));
                    }
                    checkpoint.history.push(ChatMessage::user(text));
                }
                TurnInput::Resume(value) => {
                    let step = checkpoint
                        .pending
                        .take()
                        .ok_or_else(|| AgentError::executor("No suspended tool calls to resume"))?;

                    match self.resume(step, value).await? {
                        StepOutcome::Suspended(step, interrupts) => {
                            checkpoint.pending = Some(step);
                            self.checkpoints.save(session_id, checkpoint).await;
                            yield TurnEvent::Interrupts(interrupts);
                            return;
                        }
                        StepOutcome::Completed(messages) => {
                            checkpoint.history.extend(messages.iter().cloned());
                            self.checkpoints.save(session_id, checkpoint.clone()).await;
                            yield TurnEvent::Updates(vec![UpdateGroup::new(TOOLS_NODE, messages)]);
                        }
                    }
                }
            }

            let tools = self.config.tool_definitions();
            let mut steps = 0;

            loop {
                let reply = self.next_reply(&checkpoint.history, &tools, &mut steps).await?;
                let calls = reply.tool_calls().to_vec();

                checkpoint.history.push(reply.clone());
                yield TurnEvent::Updates(vec![UpdateGroup::new(MODEL_NODE, vec![reply])]);

                if calls.is_empty() {
                    break;
                }

                match self.process_calls(&calls).await? {
                    StepOutcome::Suspended(step, interrupts) => {
                        checkpoint.pending = Some(step);
                        self.checkpoints.save(session_id, checkpoint).await;
                        yield TurnEvent::Interrupts(interrupts);
                        return;
                    }
                    StepOutcome::Completed(messages) => {
                        checkpoint.history.extend(messages.iter().cloned());
                        self.checkpoints.save(session_id, checkpoint.clone()).await;
                        yield TurnEvent::Updates(vec![UpdateGroup::new(TOOLS_NODE, messages)]);
                    }
                }
            }

            self.checkpoints.save(session_id, checkpoint).await;
        };

        Box::pin(stream)
    }
}

fn finish(step: PendingStep, interrupts: Vec<Interrupt>) -> AgentResult<StepOutcome> {
    if !interrupts.is_empty() {
        return Ok(StepOutcome::Suspended(step, interrupts));
    }
    step.into_messages()
        .map(StepOutcome::Completed)
        .ok_or_else(|| AgentError::executor("Tool call left without a result"))
}

fn tool_message(call: &ToolCall, result: ToolResult) -> ChatMessage {
    let content = if result.is_error {
        format!("Error: {}", result.output)
    } else {
        result.output
    };
    ChatMessage::tool(call.id.clone(), call.function.name.clone(), content)
}

fn new_interrupt_id() -> String {
    Uuid::new_v4().to_string()
}
