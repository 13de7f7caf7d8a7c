//! CLI definitions for Lyceum.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lyceum CLI.
#[derive(Parser)]
#[command(name = "lyceum")]
#[command(about = "Population runtime for long-lived research agents")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.lyceum/config.toml)
    #[arg(short, long, global = true, env = "LYCEUM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Tick the agents of an experiment
    Run {
        /// Experiment name
        experiment: String,

        /// Only run this agent
        #[arg(long)]
        agent: Option<String>,

        /// Keep ticking until interrupted
        #[arg(long)]
        forever: bool,
    },

    /// Re-run the tool calls of a past agent turn without recording anything
    Replay {
        /// Experiment name
        experiment: String,

        /// Agent name
        agent: String,

        /// Id of the agent turn to replay
        turn_id: i64,
    },

    /// Experiment management commands
    Experiment {
        #[command(subcommand)]
        action: ExperimentAction,
    },

    /// Agent management commands
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ExperimentAction {
    /// Create an experiment from a problem statement file
    Create {
        /// Experiment name
        name: String,

        /// File holding the problem statement
        #[arg(long)]
        problem: PathBuf,
    },

    /// List all experiments
    List,
}

#[derive(Subcommand)]
pub(crate) enum AgentAction {
    /// Register an agent in an experiment
    Create {
        /// Agent name
        name: String,

        /// Experiment name
        #[arg(short, long)]
        experiment: String,

        /// Model provider (anthropic, openai, gemini)
        #[arg(long)]
        provider: String,

        /// Model identifier
        #[arg(long)]
        model: String,

        /// File holding the initial operating instructions
        #[arg(long)]
        instructions: Option<PathBuf>,
    },

    /// List the agents of an experiment
    List {
        /// Experiment name
        #[arg(short, long)]
        experiment: String,
    },

    /// Show an agent's token usage and current instructions
    Show {
        /// Agent name
        name: String,

        /// Experiment name
        #[arg(short, long)]
        experiment: String,
    },
}
