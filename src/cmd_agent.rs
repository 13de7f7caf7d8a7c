//! Agent subcommand handlers.

use std::path::Path;

use anyhow::{Context, bail};
use tracing::info;

use lyceum_protocols::{ConversationLog, EvolutionStore, ProviderKind, TokenUsage};
use lyceum_store_sqlite::SqliteStore;

use crate::cli::AgentAction;

/// Handle agent subcommands.
pub(crate) async fn handle_agent_command(
    store: &SqliteStore,
    action: AgentAction,
) -> anyhow::Result<()> {
    match action {
        AgentAction::Create {
            name,
            experiment,
            provider,
            model,
            instructions,
        } => {
            agent_create(
                store,
                &experiment,
                &name,
                &provider,
                &model,
                instructions.as_deref(),
            )
            .await
        }
        AgentAction::List { experiment } => agent_list(store, &experiment).await,
        AgentAction::Show { name, experiment } => agent_show(store, &experiment, &name).await,
    }
}

async fn agent_create(
    store: &SqliteStore,
    experiment: &str,
    name: &str,
    provider: &str,
    model: &str,
    instructions: Option<&Path>,
) -> anyhow::Result<()> {
    let Some(kind) = ProviderKind::parse(provider) else {
        bail!("Unknown provider '{}' (expected anthropic, openai or gemini)", provider);
    };
    let instructions = match instructions {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read instructions file {}", path.display()))?,
        ),
        None => None,
    };

    let experiment = store.experiment(experiment).await?;
    let agent = store.create_agent(experiment.id, name, kind, model).await?;
    if let Some(text) = instructions {
        store.evolve(agent.id, text).await?;
    }

    info!("Created agent {} in experiment {}", agent.name, experiment.name);
    println!(
        "Created agent '{}' (id {}, {} {})",
        agent.name, agent.id, agent.provider, agent.model
    );
    Ok(())
}

async fn agent_list(store: &SqliteStore, experiment: &str) -> anyhow::Result<()> {
    let experiment = store.experiment(experiment).await?;
    let agents = store.list_agents(experiment.id).await?;
    if agents.is_empty() {
        println!("No agents in experiment '{}'.", experiment.name);
        return Ok(());
    }

    println!("{:<6} {:<20} {:<10} MODEL", "ID", "NAME", "PROVIDER");
    for agent in agents {
        println!(
            "{:<6} {:<20} {:<10} {}",
            agent.id, agent.name, agent.provider, agent.model
        );
    }
    Ok(())
}

async fn agent_show(store: &SqliteStore, experiment: &str, name: &str) -> anyhow::Result<()> {
    let experiment = store.experiment(experiment).await?;
    let agent = store.agent(experiment.id, name).await?;
    let turns = store.list_turns(agent.id).await?;
    let usage = store.token_usage(agent.id).await?;
    let current = store.current(agent.id).await?;

    println!("Agent:      {} (id {})", agent.name, agent.id);
    println!("Experiment: {}", experiment.name);
    println!("Model:      {} {}", agent.provider, agent.model);
    println!("Turns:      {}", turns.len());
    println!("Usage:      {}", format_usage(&usage));
    println!();
    match current {
        Some(evolution) => {
            println!("Instructions (revision {}):", evolution.id);
            println!("{}", evolution.instructions);
        }
        None => println!("Instructions: (none)"),
    }
    Ok(())
}

fn format_usage(usage: &TokenUsage) -> String {
    format!(
        "{} total ({} input, {} cached, {} output, {} thinking)",
        usage.total, usage.input, usage.cached, usage.output, usage.thinking
    )
}
