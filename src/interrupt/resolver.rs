//! Interrupt resolution
//!
//! Turns one `Interrupt` into one `Decision`, either by waiting on an
//! external authorization or by asking the user at the console. Failures
//! never escape: they degrade to a declined decision.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{Decision, Interrupt, InterruptKind};
use crate::cli::Terminal;
use crate::core::AgentResult;

/// Blocks until an out-of-band authorization finishes
#[async_trait]
pub trait AuthorizationWaiter: Send + Sync {
    /// Wait for the authorization identified by `id`
    ///
    /// Returns `Ok(())` once it is granted, an error if it fails or the
    /// wait itself breaks. There is no timeout.
    async fn wait_for_completion(&self, id: &str) -> AgentResult<()>;
}

/// Resolves interrupts one at a time
pub struct InterruptResolver {
    waiter: Arc<dyn AuthorizationWaiter>,
    terminal: Arc<dyn Terminal>,
}

impl InterruptResolver {
    /// Create a resolver
    pub fn new(waiter: Arc<dyn AuthorizationWaiter>, terminal: Arc<dyn Terminal>) -> Self {
        Self { waiter, terminal }
    }

    /// Resolve a single interrupt
    pub async fn resolve(&self, interrupt: &Interrupt) -> Decision {
        match &interrupt.kind {
            InterruptKind::Authorization { tool_name, handle } => {
                self.terminal
                    .notice(&format!("Authorization required for tool call {}", tool_name));
                self.terminal
                    .notice(&format!("Please authorize in your browser {}", handle.url));
                self.terminal
                    .notice("Waiting for you to complete authorization...");

                tracing::info!(
                    "[InterruptResolver] Waiting on authorization {} for '{}'",
                    handle.id,
                    tool_name
                );

                match self.waiter.wait_for_completion(&handle.id).await {
                    Ok(()) => {
                        self.terminal
                            .notice("Authorization granted. Resuming execution...");
                        Decision::allow()
                    }
                    Err(e) => {
                        tracing::warn!(
                            "[InterruptResolver] Authorization {} failed: {}",
                            handle.id,
                            e
                        );
                        self.terminal.error(&format!(
                            "Error waiting for authorization to complete: {}",
                            e
                        ));
                        Decision::deny()
                    }
                }
            }

            InterruptKind::Approval { tool_name, input } => {
                self.terminal
                    .notice(&format!("Human in the loop required for tool call {}", tool_name));
                let shown = serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string());
                self.terminal
                    .notice(&format!("Please approve the tool call {}", shown));

                match self.terminal.confirm("Do you approve this tool call?").await {
                    Ok(approved) => {
                        tracing::info!(
                            "[InterruptResolver] '{}' {}",
                            tool_name,
                            if approved { "approved" } else { "declined" }
                        );
                        Decision { authorized: approved }
                    }
                    Err(e) => {
                        tracing::warn!("[InterruptResolver] Approval prompt failed: {}", e);
                        self.terminal
                            .error(&format!("Could not read approval: {}", e));
                        Decision::deny()
                    }
                }
            }

            InterruptKind::Unrecognized(payload) => {
                tracing::debug!(
                    "[InterruptResolver] Declining unrecognized interrupt {}: {}",
                    interrupt.id,
                    payload
                );
                Decision::deny()
            }
        }
    }

    /// Resolve every interrupt of a pass, in collection order
    pub async fn resolve_all(&self, interrupts: &[Interrupt]) -> Vec<Decision> {
        let mut decisions = Vec::with_capacity(interrupts.len());
        for interrupt in interrupts {
            decisions.push(self.resolve(interrupt).await);
        }
        decisions
    }
}
