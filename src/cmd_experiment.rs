//! Experiment subcommand handlers.

use std::path::Path;

use anyhow::{Context, bail};
use tracing::info;

use lyceum_store_sqlite::SqliteStore;

use crate::cli::ExperimentAction;

/// Handle experiment subcommands.
pub(crate) async fn handle_experiment_command(
    store: &SqliteStore,
    action: ExperimentAction,
) -> anyhow::Result<()> {
    match action {
        ExperimentAction::Create { name, problem } => {
            experiment_create(store, &name, &problem).await
        }
        ExperimentAction::List => experiment_list(store).await,
    }
}

async fn experiment_create(store: &SqliteStore, name: &str, problem: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(problem)
        .with_context(|| format!("Failed to read problem file {}", problem.display()))?;
    if text.trim().is_empty() {
        bail!("Problem file {} is empty", problem.display());
    }

    let experiment = store.create_experiment(name, &text).await?;
    info!("Created experiment {} (id {})", experiment.name, experiment.id);
    println!("Created experiment '{}' (id {})", experiment.name, experiment.id);
    Ok(())
}

async fn experiment_list(store: &SqliteStore) -> anyhow::Result<()> {
    let experiments = store.list_experiments().await?;
    if experiments.is_empty() {
        println!("No experiments.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<8} CREATED", "ID", "NAME", "AGENTS");
    for experiment in experiments {
        let agents = store.list_agents(experiment.id).await?.len();
        println!(
            "{:<6} {:<24} {:<8} {}",
            experiment.id,
            experiment.name,
            agents,
            experiment.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_create_reads_problem_file() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Find the smallest counterexample.").unwrap();

        experiment_create(&store, "search", file.path()).await.unwrap();

        let experiment = store.experiment("search").await.unwrap();
        assert!(experiment.problem.starts_with("Find the smallest"));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_problem() {
        let store = SqliteStore::in_memory().await.unwrap();
        let file = NamedTempFile::new().unwrap();

        let err = experiment_create(&store, "search", file.path()).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(store.find_experiment("search").await.unwrap().is_none());
    }
}
