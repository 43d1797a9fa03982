//! Session Loop
//!
//! Reads one line at a time, runs it as a turn, and reports turn failures
//! without leaving the session. Owns the session identifier.

use std::sync::Arc;

use crate::cli::Terminal;
use crate::core::AgentResult;
use crate::turn::{SessionContext, TurnInput, TurnLoop};

/// Prompt shown before each user message
pub const PROMPT: &str = "> ";

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit`
    Exit,
    /// Standard input was closed
    EndOfInput,
}

/// Interactive read-run-report loop
pub struct SessionLoop {
    turns: TurnLoop,
    terminal: Arc<dyn Terminal>,
    session: SessionContext,
}

impl SessionLoop {
    /// Create a session loop bound to one session identifier
    pub fn new(turns: TurnLoop, terminal: Arc<dyn Terminal>, session_id: impl Into<String>) -> Self {
        Self {
            turns,
            terminal,
            session: SessionContext::new(session_id),
        }
    }

    /// The session this loop threads through every turn
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Run until the user exits or input closes
    ///
    /// Only console read failures are returned; turn failures are printed
    /// and the loop goes back to the prompt.
    pub async fn run(&self) -> AgentResult<SessionEnd> {
        self.terminal.banner();
        tracing::info!("[SessionLoop] Started session {}", self.session.session_id);

        let end = loop {
            let Some(input) = self.terminal.read_line(PROMPT).await? else {
                tracing::info!("[SessionLoop] Input closed");
                break SessionEnd::EndOfInput;
            };

            if is_exit(&input) {
                tracing::info!("[SessionLoop] User requested exit");
                break SessionEnd::Exit;
            }

            if input.trim().is_empty() {
                continue;
            }

            tracing::info!("[SessionLoop] Running turn");
            if let Err(e) = self
                .turns
                .run_turn(TurnInput::message(input), &self.session)
                .await
            {
                tracing::error!("[SessionLoop] Turn failed: {:?}", e);
                self.terminal.error(&e.to_string());
            }
        };

        self.terminal.farewell();
        Ok(end)
    }
}

fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}
