//! `run` and `replay` handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use lyceum_config::Config;
use lyceum_protocols::{AgentProfile, Experiment};
use lyceum_runtime::{
    AgentDriver, LoopReport, StopReason, TickController, TickOutcome, TickReport,
};
use lyceum_store_sqlite::SqliteStore;

use crate::adapters::{ToolServers, build_controller};

/// Tick the agents of an experiment once, or until Ctrl-C with `forever`.
pub(crate) async fn run(
    config: &Config,
    store: Arc<SqliteStore>,
    experiment: &str,
    agent: Option<&str>,
    forever: bool,
) -> anyhow::Result<()> {
    let experiment = store.experiment(experiment).await?;
    let agents = match agent {
        Some(name) => vec![store.agent(experiment.id, name).await?],
        None => store.list_agents(experiment.id).await?,
    };
    if agents.is_empty() {
        bail!("Experiment '{}' has no agents", experiment.name);
    }

    let mut servers = Vec::with_capacity(agents.len());
    let controllers = match wire_agents(config, &store, &experiment, agents, &mut servers).await {
        Ok(controllers) => controllers,
        Err(e) => {
            shutdown_all(&servers).await;
            return Err(e);
        }
    };

    let mut driver = AgentDriver::new(controllers)
        .with_tick_interval(Duration::from_millis(config.runtime.tick_interval_ms));
    info!(
        "Running {} agent(s) of experiment {}{}",
        driver.len(),
        experiment.name,
        if forever { " until interrupted" } else { "" }
    );

    let failed = if forever {
        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping agents after their current tick");
            }
            signal.cancel();
        });

        let reports = driver.run_forever(shutdown).await;
        reports.iter().for_each(print_loop_report);
        reports
            .iter()
            .filter(|r| !matches!(r.stop, StopReason::Shutdown))
            .count()
    } else {
        let reports = driver.run_once().await;
        reports.iter().for_each(print_tick_report);
        reports.iter().filter(|r| r.result.is_err()).count()
    };

    shutdown_all(&servers).await;

    if failed > 0 {
        bail!("{} agent(s) stopped with an error", failed);
    }
    Ok(())
}

/// Connect each agent's own tool servers and build its controller.
/// Connected servers land in `servers` even when a later agent fails.
async fn wire_agents(
    config: &Config,
    store: &Arc<SqliteStore>,
    experiment: &Experiment,
    agents: Vec<AgentProfile>,
    servers: &mut Vec<ToolServers>,
) -> anyhow::Result<Vec<TickController>> {
    let mut controllers = Vec::with_capacity(agents.len());
    for agent in agents {
        let connected = ToolServers::connect(&config.tool_servers, experiment, &agent).await?;
        let controller = build_controller(config, store, &connected, experiment, agent);
        servers.push(connected);
        controllers.push(controller?);
    }
    Ok(controllers)
}

async fn shutdown_all(servers: &[ToolServers]) {
    for agent_servers in servers {
        agent_servers.shutdown().await;
    }
}

fn print_tick_report(report: &TickReport) {
    match &report.result {
        Ok(TickOutcome::NoOp) => println!("{}: empty turn, nothing recorded", report.agent),
        Ok(outcome @ TickOutcome::Completed { agent_turn, .. }) => println!(
            "{}: turn {} at position {}, {} tool call(s)",
            report.agent,
            agent_turn.id,
            agent_turn.position,
            outcome.tool_calls()
        ),
        Err(e) => println!("{}: failed: {}", report.agent, e),
    }
}

fn print_loop_report(report: &LoopReport) {
    match report.stop {
        StopReason::Shutdown => {
            println!("{}: stopped after {} tick(s)", report.agent, report.ticks)
        }
        StopReason::Failed(ref e) => println!(
            "{}: failed after {} tick(s): {}",
            report.agent, report.ticks, e
        ),
        StopReason::Panicked(ref message) => println!(
            "{}: panicked after {} tick(s): {}",
            report.agent, report.ticks, message
        ),
    }
}

/// Re-run the tool calls of one agent turn and print the results.
pub(crate) async fn replay(
    config: &Config,
    store: Arc<SqliteStore>,
    experiment: &str,
    agent: &str,
    turn_id: i64,
) -> anyhow::Result<()> {
    let experiment = store.experiment(experiment).await?;
    let agent = store.agent(experiment.id, agent).await?;
    let name = agent.name.clone();

    let servers = ToolServers::connect(&config.tool_servers, &experiment, &agent).await?;
    let controller = match build_controller(config, &store, &servers, &experiment, agent) {
        Ok(controller) => controller,
        Err(e) => {
            servers.shutdown().await;
            return Err(e);
        }
    };
    let results = controller
        .replay(turn_id)
        .await
        .with_context(|| format!("Replay of turn {} for agent '{}' failed", turn_id, name));
    servers.shutdown().await;
    let results = results?;

    if results.is_empty() {
        warn!("Turn {} made no tool calls", turn_id);
        println!("Turn {} made no tool calls.", turn_id);
        return Ok(());
    }
    for result in results {
        let marker = if result.is_error { " (error)" } else { "" };
        println!("--- {}{}\n{}", result.tool_name, marker, result.content);
    }
    Ok(())
}
