//! Tick controller: one quantum of agent progress.
//!
//! A tick fetches the tool catalog, opens a new loop if the agent is idle,
//! renders the context window, calls the model, runs the requested tools,
//! and persists the agent turn followed by its tool-result turn.

use std::sync::Arc;

use tracing::{debug, info, warn};

use lyceum_protocols::model::validate_agent_content;
use lyceum_protocols::{
    AgentProfile, Block, ConversationLog, EvolutionStore, ModelAdapter, ModelRequest, Role,
    RuntimeError, StatusSource, ToolCall, ToolError, ToolResult, Turn, TurnId,
};

use crate::lease::AgentLeases;
use crate::router::ToolRouter;
use crate::status::StaticStatus;
use crate::trace;
use crate::window::ContextWindow;

/// What a successful tick did.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// The model returned an empty turn; nothing was persisted.
    NoOp,
    /// An agent turn was persisted, followed by its tool results if it made calls.
    Completed {
        agent_turn: Turn,
        results_turn: Option<Turn>,
    },
}

impl TickOutcome {
    /// Number of tool calls executed by the tick.
    pub fn tool_calls(&self) -> usize {
        match self {
            TickOutcome::NoOp => 0,
            TickOutcome::Completed { results_turn, .. } => {
                results_turn.as_ref().map(|t| t.content.len()).unwrap_or(0)
            }
        }
    }
}

/// How the last persisted turn leaves the agent.
#[derive(Debug, PartialEq)]
enum LoopState {
    /// Empty log, or the agent spoke without calling tools.
    Idle,
    /// Tool results were recorded; the model answers them next.
    AwaitingModel,
    /// The agent called tools but no result turn was recorded.
    Interrupted(Vec<ToolCall>),
}

impl LoopState {
    fn of(last: Option<&Turn>) -> Self {
        match last {
            None => LoopState::Idle,
            Some(turn) if turn.role == Role::User => LoopState::AwaitingModel,
            Some(turn) if turn.has_tool_calls() => LoopState::Interrupted(turn.tool_calls()),
            Some(_) => LoopState::Idle,
        }
    }
}

/// Drives one agent. Owns the agent's window cursor for its lifetime.
pub struct TickController {
    agent: AgentProfile,
    goal: String,
    log: Arc<dyn ConversationLog>,
    evolutions: Arc<dyn EvolutionStore>,
    model: Arc<dyn ModelAdapter>,
    router: Arc<ToolRouter>,
    status: Arc<dyn StatusSource>,
    leases: AgentLeases,
    window: ContextWindow,
}

impl TickController {
    pub fn new(
        agent: AgentProfile,
        goal: impl Into<String>,
        log: Arc<dyn ConversationLog>,
        evolutions: Arc<dyn EvolutionStore>,
        model: Arc<dyn ModelAdapter>,
        router: Arc<ToolRouter>,
    ) -> Self {
        Self {
            agent,
            goal: goal.into(),
            log,
            evolutions,
            model,
            router,
            status: Arc::new(StaticStatus::default()),
            leases: AgentLeases::global(),
            window: ContextWindow::new(),
        }
    }

    /// Set the source of synthetic user turn text.
    pub fn with_status(mut self, status: Arc<dyn StatusSource>) -> Self {
        self.status = status;
        self
    }

    /// Use a specific lease registry instead of the process-wide one.
    pub fn with_leases(mut self, leases: AgentLeases) -> Self {
        self.leases = leases;
        self
    }

    pub fn agent(&self) -> &AgentProfile {
        &self.agent
    }

    /// Current window cursor.
    pub fn loop_start(&self) -> i64 {
        self.window.loop_start()
    }

    /// Run one tick. Only catalog and model failures (plus storage and
    /// context overflow) abort it; tool failures become error results.
    pub async fn tick(&mut self) -> Result<TickOutcome, RuntimeError> {
        let _lease = self.leases.acquire(self.agent.id)?;
        debug!("Tick started for agent {}", self.agent.name);

        let catalog = self.router.catalog().await?;

        let mut turns = self.log.list_turns(self.agent.id).await?;
        let opened = self.open_loop(turns.last()).await?;
        if let Some(turn) = opened {
            turns.push(turn);
        }

        let system = self.system_instructions().await?;
        let slice = self
            .window
            .render(&turns, &system, &catalog, self.model.as_ref())?;

        let request = ModelRequest::new(slice, system).with_catalog(catalog);
        let response = self.model.run(request).await?;
        validate_agent_content(&response.content)?;

        if response.is_empty() {
            warn!(
                "Model returned an empty turn for agent {}, skipping",
                self.agent.name
            );
            return Ok(TickOutcome::NoOp);
        }

        let calls: Vec<ToolCall> = response
            .content
            .iter()
            .filter_map(Block::as_tool_call)
            .collect();
        let results = self.router.execute_all(&calls).await;

        let agent_turn = self
            .log
            .append(self.agent.id, Role::Agent, response.content, response.usage)
            .await?;

        let results_turn = if results.is_empty() {
            None
        } else {
            let blocks = results.into_iter().map(Block::from).collect();
            Some(
                self.log
                    .append(self.agent.id, Role::User, blocks, None)
                    .await?,
            )
        };

        trace::trace_turn(&self.agent.name, &agent_turn);
        if let Some(ref turn) = results_turn {
            trace::trace_turn(&self.agent.name, turn);
        }

        info!(
            "Tick completed for agent {}: turn {} with {} tool call(s)",
            self.agent.name,
            agent_turn.position,
            calls.len()
        );

        Ok(TickOutcome::Completed {
            agent_turn,
            results_turn,
        })
    }

    /// Re-run the tool calls of a past agent turn against live servers.
    /// Nothing is appended to the log.
    pub async fn replay(&self, turn_id: TurnId) -> Result<Vec<ToolResult>, RuntimeError> {
        let _lease = self.leases.acquire(self.agent.id)?;

        let turn = self
            .log
            .find_turn(self.agent.id, turn_id)
            .await?
            .ok_or(RuntimeError::TurnNotFound(turn_id))?;
        if turn.role != Role::Agent {
            return Err(RuntimeError::NotAgentTurn(turn_id));
        }

        let calls = turn.tool_calls();
        info!(
            "Replaying {} tool call(s) of turn {} for agent {}",
            calls.len(),
            turn_id,
            self.agent.name
        );
        let results = self.router.execute_all(&calls).await;

        let blocks: Vec<Block> = results.iter().cloned().map(Block::from).collect();
        trace::trace_blocks(&self.agent.name, Some(turn_id), &blocks);

        Ok(results)
    }

    /// Decide whether the next model call needs a new user turn first.
    async fn open_loop(&self, last: Option<&Turn>) -> Result<Option<Turn>, RuntimeError> {
        match LoopState::of(last) {
            LoopState::AwaitingModel => Ok(None),
            LoopState::Idle => {
                let text = self.status.status(&self.agent).await?;
                let turn = self
                    .log
                    .append(self.agent.id, Role::User, vec![Block::text(text)], None)
                    .await?;
                debug!(
                    "Opened a new loop for agent {} at position {}",
                    self.agent.name, turn.position
                );
                trace::trace_turn(&self.agent.name, &turn);
                Ok(Some(turn))
            }
            LoopState::Interrupted(calls) => {
                warn!(
                    "Agent {} has {} tool call(s) without results, recording them as interrupted",
                    self.agent.name,
                    calls.len()
                );
                let blocks = calls
                    .iter()
                    .map(|call| {
                        let err = ToolError::ExecutionFailed {
                            tool: call.name.clone(),
                            message: "interrupted before its result was recorded".to_string(),
                        };
                        Block::from(ToolResult::error(call, err.to_result_text()))
                    })
                    .collect();
                let turn = self
                    .log
                    .append(self.agent.id, Role::User, blocks, None)
                    .await?;
                trace::trace_turn(&self.agent.name, &turn);
                Ok(Some(turn))
            }
        }
    }

    /// Goal statement followed by the latest operating instructions.
    async fn system_instructions(&self) -> Result<String, RuntimeError> {
        let current = self.evolutions.current(self.agent.id).await?;
        Ok(match current {
            Some(evolution) if !evolution.instructions.is_empty() => {
                format!("{}\n\n{}", self.goal, evolution.instructions)
            }
            _ => self.goal.clone(),
        })
    }
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
