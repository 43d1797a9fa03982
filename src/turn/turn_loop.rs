//! Turn Loop
//!
//! Runs passes until one finishes without interrupts:
//! - content updates are rendered as they arrive
//! - interrupts are buffered, then resolved in order once the pass ends
//! - the next pass resumes with one decision per interrupt

use std::sync::Arc;

use futures::StreamExt;

use super::executor::{SessionContext, TurnEvent, TurnExecutor, TurnInput};
use crate::cli::Terminal;
use crate::core::AgentResult;
use crate::interrupt::{Interrupt, InterruptResolver, ResumeValue};

/// Drives one user turn to completion
pub struct TurnLoop {
    executor: Arc<dyn TurnExecutor>,
    resolver: InterruptResolver,
    terminal: Arc<dyn Terminal>,
}

impl TurnLoop {
    /// Create a turn loop
    pub fn new(
        executor: Arc<dyn TurnExecutor>,
        resolver: InterruptResolver,
        terminal: Arc<dyn Terminal>,
    ) -> Self {
        Self {
            executor,
            resolver,
            terminal,
        }
    }

    /// Run a turn until a pass yields no interrupts
    ///
    /// There is no pass limit. A stream error aborts the turn and is returned
    /// as is; nothing is retried.
    pub async fn run_turn(&self, initial: TurnInput, session: &SessionContext) -> AgentResult<()> {
        let mut current = initial;
        let mut pass = 0usize;

        loop {
            pass += 1;
            tracing::debug!("[TurnLoop] Pass {} for session {}", pass, session.session_id);

            let interrupts = self.run_pass(current, session).await?;
            if interrupts.is_empty() {
                tracing::info!("[TurnLoop] Turn complete after {} pass(es)", pass);
                return Ok(());
            }

            tracing::info!(
                "[TurnLoop] Pass {} raised {} interrupt(s)",
                pass,
                interrupts.len()
            );

            let decisions = self.resolver.resolve_all(&interrupts).await;
            debug_assert_eq!(decisions.len(), interrupts.len());

            current = TurnInput::Resume(ResumeValue::from_decisions(decisions));
        }
    }

    /// Stream one pass, rendering updates and collecting interrupts
    async fn run_pass(
        &self,
        input: TurnInput,
        session: &SessionContext,
    ) -> AgentResult<Vec<Interrupt>> {
        let mut events = self.executor.stream(input, session);
        let mut interrupts = Vec::new();

        while let Some(event) = events.next().await {
            match event? {
                TurnEvent::Interrupts(mut batch) => interrupts.append(&mut batch),
                TurnEvent::Updates(groups) => {
                    for group in groups {
                        tracing::trace!(
                            "[TurnLoop] {} message(s) from '{}'",
                            group.messages.len(),
                            group.node
                        );
                        for message in &group.messages {
                            self.terminal.show_message(message);
                        }
                    }
                }
            }
        }

        Ok(interrupts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing::ScriptedTerminal;
    use crate::core::AgentError;
    use crate::interrupt::{AuthorizationWaiter, Decision};
    use crate::llm::ChatMessage;
    use crate::turn::executor::{EventStream, UpdateGroup};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type ScriptedPass = Vec<Result<TurnEvent, String>>;

    /// Executor replaying one scripted pass per call and recording its inputs
    struct ScriptedExecutor {
        passes: Mutex<VecDeque<ScriptedPass>>,
        inputs: Mutex<Vec<TurnInput>>,
    }

    impl ScriptedExecutor {
        fn new(passes: Vec<ScriptedPass>) -> Arc<Self> {
            Arc::new(Self {
                passes: Mutex::new(passes.into()),
                inputs: Mutex::new(Vec::new()),
            })
        }

        fn inputs(&self) -> Vec<TurnInput> {
            self.inputs.lock().unwrap().clone()
        }
    }

    impl TurnExecutor for ScriptedExecutor {
        fn stream<'a>(&'a self, input: TurnInput, _session: &'a SessionContext) -> EventStream<'a> {
            self.inputs.lock().unwrap().push(input);
            let pass = self.passes.lock().unwrap().pop_front().unwrap_or_default();
            let items: Vec<AgentResult<TurnEvent>> = pass
                .into_iter()
                .map(|item| item.map_err(AgentError::executor))
                .collect();
            Box::pin(futures::stream::iter(items))
        }
    }

    struct GrantAll;

    #[async_trait]
    impl AuthorizationWaiter for GrantAll {
        async fn wait_for_completion(&self, _id: &str) -> AgentResult<()> {
            Ok(())
        }
    }

    fn update(text: &str) -> Result<TurnEvent, String> {
        Ok(TurnEvent::Updates(vec![UpdateGroup::new(
            "model",
            vec![ChatMessage::assistant(text)],
        )]))
    }

    fn auth_interrupt(id: &str) -> Interrupt {
        Interrupt::authorization(id, "Confluence_WhoAmI", "https://auth/x", format!("auth-{}", id))
    }

    fn turn_loop(executor: Arc<ScriptedExecutor>, terminal: Arc<ScriptedTerminal>) -> TurnLoop {
        let resolver = InterruptResolver::new(Arc::new(GrantAll), terminal.clone());
        TurnLoop::new(executor, resolver, terminal)
    }

    fn session() -> SessionContext {
        SessionContext::new("1")
    }

    #[tokio::test]
    async fn test_zero_interrupts_ends_turn() {
        let executor = ScriptedExecutor::new(vec![vec![update("hello")]]);
        let terminal = ScriptedTerminal::new(&[], &[]);
        let turn = turn_loop(executor.clone(), terminal.clone());

        turn.run_turn(TurnInput::message("hi"), &session()).await.unwrap();

        assert_eq!(executor.inputs(), vec![TurnInput::message("hi")]);
        assert_eq!(terminal.output(), vec!["message: Ai: hello"]);
    }

    #[tokio::test]
    async fn test_updates_render_before_resolution() {
        let executor = ScriptedExecutor::new(vec![
            vec![
                update("U1"),
                update("U2"),
                Ok(TurnEvent::Interrupts(vec![auth_interrupt("i1")])),
            ],
            vec![update("done")],
        ]);
        let terminal = ScriptedTerminal::new(&[], &[]);
        let turn = turn_loop(executor.clone(), terminal.clone());

        turn.run_turn(TurnInput::message("who am i"), &session())
            .await
            .unwrap();

        assert_eq!(
            executor.inputs(),
            vec![
                TurnInput::message("who am i"),
                TurnInput::Resume(ResumeValue::Single(Decision::allow())),
            ]
        );

        let output = terminal.output();
        let u1 = output.iter().position(|l| l == "message: Ai: U1").unwrap();
        let u2 = output.iter().position(|l| l == "message: Ai: U2").unwrap();
        let auth = output
            .iter()
            .position(|l| l.contains("Authorization required"))
            .unwrap();
        assert!(u1 < u2 && u2 < auth);
        assert_eq!(output.last().unwrap(), "message: Ai: done");
    }

    #[tokio::test]
    async fn test_mixed_interrupts_resume_in_order() {
        let executor = ScriptedExecutor::new(vec![
            vec![Ok(TurnEvent::Interrupts(vec![
                auth_interrupt("i1"),
                Interrupt::approval("i2", "Confluence_CreatePage", json!({"title": "T"})),
            ]))],
            vec![],
        ]);
        let terminal = ScriptedTerminal::new(&[], &[false]);
        let turn = turn_loop(executor.clone(), terminal.clone());

        turn.run_turn(TurnInput::message("create it"), &session())
            .await
            .unwrap();

        let inputs = executor.inputs();
        assert_eq!(inputs.len(), 2);
        assert_eq!(
            inputs[1],
            TurnInput::Resume(ResumeValue::Many(vec![Decision::allow(), Decision::deny()]))
        );
    }

    #[tokio::test]
    async fn test_interrupts_across_events_are_collected() {
        let executor = ScriptedExecutor::new(vec![
            vec![
                Ok(TurnEvent::Interrupts(vec![auth_interrupt("i1")])),
                update("between"),
                Ok(TurnEvent::Interrupts(vec![auth_interrupt("i2")])),
            ],
            vec![],
        ]);
        let terminal = ScriptedTerminal::new(&[], &[]);
        let turn = turn_loop(executor.clone(), terminal);

        turn.run_turn(TurnInput::message("go"), &session()).await.unwrap();

        match &executor.inputs()[1] {
            TurnInput::Resume(value) => assert_eq!(value.len(), 2),
            other => panic!("expected resume, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resuspension_runs_until_clear() {
        let suspend = || vec![Ok(TurnEvent::Interrupts(vec![auth_interrupt("again")]))];
        let executor = ScriptedExecutor::new(vec![suspend(), suspend(), suspend(), vec![]]);
        let terminal = ScriptedTerminal::new(&[], &[]);
        let turn = turn_loop(executor.clone(), terminal);

        turn.run_turn(TurnInput::message("go"), &session()).await.unwrap();

        assert_eq!(executor.inputs().len(), 4);
    }

    #[tokio::test]
    async fn test_stream_error_aborts_without_resume() {
        let executor = ScriptedExecutor::new(vec![
            vec![update("partial"), Err("connection reset".to_string())],
            vec![update("never")],
        ]);
        let terminal = ScriptedTerminal::new(&[], &[]);
        let turn = turn_loop(executor.clone(), terminal.clone());

        let err = turn
            .run_turn(TurnInput::message("go"), &session())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(executor.inputs().len(), 1);
        assert_eq!(terminal.output(), vec!["message: Ai: partial"]);
    }
}
