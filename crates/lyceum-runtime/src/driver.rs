//! Runs the ticks of many agents in parallel.
//!
//! Agents share nothing at tick time, so the driver needs no coordination
//! beyond starting and stopping them. A failing agent never cancels the others.

use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use lyceum_protocols::RuntimeError;

use crate::tick::{TickController, TickOutcome};

/// Result of one agent's single tick.
#[derive(Debug)]
pub struct TickReport {
    pub agent: String,
    pub result: Result<TickOutcome, RuntimeError>,
}

/// Why an agent's forever loop ended.
#[derive(Debug)]
pub enum StopReason {
    Shutdown,
    Failed(RuntimeError),
    Panicked(String),
}

/// Summary of one agent's forever loop.
#[derive(Debug)]
pub struct LoopReport {
    pub agent: String,
    pub ticks: u64,
    pub stop: StopReason,
}

/// Driver over a set of agent controllers.
pub struct AgentDriver {
    controllers: Vec<TickController>,
    tick_interval: Duration,
}

impl AgentDriver {
    pub fn new(controllers: Vec<TickController>) -> Self {
        Self {
            controllers,
            tick_interval: Duration::ZERO,
        }
    }

    /// Pause between two ticks of the same agent in forever mode.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Tick every agent once, concurrently.
    pub async fn run_once(&mut self) -> Vec<TickReport> {
        let ticks = self.controllers.iter_mut().map(|controller| async move {
            let result = controller.tick().await;
            let agent = controller.agent().name.clone();
            if let Err(ref e) = result {
                error!("Tick failed for agent {}: {}", agent, e);
            }
            TickReport { agent, result }
        });
        join_all(ticks).await
    }

    /// Tick every agent until shutdown. An agent stops on its first error.
    pub async fn run_forever(self, shutdown: CancellationToken) -> Vec<LoopReport> {
        let interval = self.tick_interval;
        info!("Starting {} agent loop(s)", self.controllers.len());

        let handles: Vec<_> = self
            .controllers
            .into_iter()
            .map(|controller| {
                let name = controller.agent().name.clone();
                let handle = tokio::spawn(agent_loop(controller, interval, shutdown.clone()));
                (name, handle)
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (agent, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Agent loop for {} aborted: {}", agent, e);
                    reports.push(LoopReport {
                        agent,
                        ticks: 0,
                        stop: StopReason::Panicked(e.to_string()),
                    });
                }
            }
        }
        reports
    }
}

async fn agent_loop(
    mut controller: TickController,
    interval: Duration,
    shutdown: CancellationToken,
) -> LoopReport {
    let agent = controller.agent().name.clone();
    let mut ticks = 0;
    info!("Agent loop started: {}", agent);

    while !shutdown.is_cancelled() {
        match controller.tick().await {
            Ok(outcome) => {
                ticks += 1;
                debug!(
                    "Agent {} tick {} done ({} tool call(s))",
                    agent,
                    ticks,
                    outcome.tool_calls()
                );
            }
            Err(e) => {
                error!("Agent {} stopped after {} tick(s): {}", agent, ticks, e);
                return LoopReport {
                    agent,
                    ticks,
                    stop: StopReason::Failed(e),
                };
            }
        }

        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    info!("Agent loop stopped: {} after {} tick(s)", agent, ticks);
    LoopReport {
        agent,
        ticks,
        stop: StopReason::Shutdown,
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
