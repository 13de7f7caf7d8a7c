//! SQLite-backed conversation log, evolution store and registry.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use tokio_rusqlite::Connection;
use tracing::debug;

use lyceum_protocols::{
    AgentId, AgentProfile, Block, ConversationLog, Evolution, EvolutionStore, Experiment, LogError,
    ProviderKind, Role, TokenUsage, Turn, TurnId,
};

use crate::error::StoreError;
use crate::rows::{self, TURN_COLUMNS, TURN_FROM, TurnRow};
use crate::schema::init_schema;

/// Durable store shared by every agent of a process.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::init(conn).await
    }

    /// Open (or create) a database file, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Connection(format!("{}: {}", parent.display(), e)))?;
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        conn.call(|conn| {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        })
        .await?;

        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(init_schema(conn)?)).await?;
        Ok(Self { conn })
    }

    pub async fn create_experiment(
        &self,
        name: &str,
        problem: &str,
    ) -> Result<Experiment, StoreError> {
        let name = name.to_string();
        let problem = problem.to_string();
        let now = Utc::now();
        let created = now.to_rfc3339();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO experiments (name, problem, created_at) VALUES (?1, ?2, ?3)",
                    params![name, problem, created],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        self.experiment_by_id(id).await
    }

    async fn experiment_by_id(&self, id: i64) -> Result<Experiment, StoreError> {
        self.conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, name, problem, created_at FROM experiments WHERE id = ?1",
                        [id],
                        rows::experiment,
                    )
                    .optional()?)
            })
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("experiment {}", id)))
    }

    pub async fn find_experiment(&self, name: &str) -> Result<Option<Experiment>, StoreError> {
        let name = name.to_string();
        Ok(self
            .conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, name, problem, created_at FROM experiments WHERE name = ?1",
                        [name],
                        rows::experiment,
                    )
                    .optional()?)
            })
            .await?)
    }

    /// Like [`find_experiment`](Self::find_experiment) but missing is an error.
    pub async fn experiment(&self, name: &str) -> Result<Experiment, StoreError> {
        self.find_experiment(name)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("experiment {}", name)))
    }

    pub async fn list_experiments(&self) -> Result<Vec<Experiment>, StoreError> {
        Ok(self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, problem, created_at FROM experiments ORDER BY id",
                )?;
                let experiments = stmt
                    .query_map([], rows::experiment)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(experiments)
            })
            .await?)
    }

    pub async fn create_agent(
        &self,
        experiment_id: i64,
        name: &str,
        provider: ProviderKind,
        model: &str,
    ) -> Result<AgentProfile, StoreError> {
        let name = name.to_string();
        let model = model.to_string();
        let created = Utc::now().to_rfc3339();

        Ok(self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO agents (experiment_id, name, provider, model, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![experiment_id, name, provider.as_str(), model, created],
                )?;
                let id = conn.last_insert_rowid();
                Ok(conn.query_row(
                    "SELECT id, experiment_id, name, provider, model, created_at
                     FROM agents WHERE id = ?1",
                    [id],
                    rows::agent,
                )?)
            })
            .await?)
    }

    pub async fn find_agent(
        &self,
        experiment_id: i64,
        name: &str,
    ) -> Result<Option<AgentProfile>, StoreError> {
        let name = name.to_string();
        Ok(self
            .conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, experiment_id, name, provider, model, created_at
                         FROM agents WHERE experiment_id = ?1 AND name = ?2",
                        params![experiment_id, name],
                        rows::agent,
                    )
                    .optional()?)
            })
            .await?)
    }

    /// Like [`find_agent`](Self::find_agent) but missing is an error.
    pub async fn agent(&self, experiment_id: i64, name: &str) -> Result<AgentProfile, StoreError> {
        self.find_agent(experiment_id, name)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("agent {}", name)))
    }

    pub async fn list_agents(&self, experiment_id: i64) -> Result<Vec<AgentProfile>, StoreError> {
        Ok(self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, experiment_id, name, provider, model, created_at
                     FROM agents WHERE experiment_id = ?1 ORDER BY id",
                )?;
                let agents = stmt
                    .query_map([experiment_id], rows::agent)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(agents)
            })
            .await?)
    }
}

#[async_trait]
impl ConversationLog for SqliteStore {
    async fn list_turns(&self, agent: AgentId) -> Result<Vec<Turn>, LogError> {
        let raw = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} {} WHERE t.agent_id = ?1 ORDER BY t.position",
                    TURN_COLUMNS, TURN_FROM
                ))?;
                let turns = stmt
                    .query_map([agent], TurnRow::read)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(turns)
            })
            .await
            .map_err(StoreError::from)?;

        raw.into_iter()
            .map(|row| row.into_turn().map_err(LogError::from))
            .collect()
    }

    async fn append(
        &self,
        agent: AgentId,
        role: Role,
        content: Vec<Block>,
        usage: Option<TokenUsage>,
    ) -> Result<Turn, LogError> {
        let json = serde_json::to_string(&content)?;
        let created_at = Utc::now();
        let created = created_at.to_rfc3339();
        let recorded_usage = if role == Role::Agent { usage } else { None };

        let inserted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let position: i64 = tx.query_row(
                    "SELECT COALESCE(MAX(position), -1) + 1 FROM turns WHERE agent_id = ?1",
                    [agent],
                    |row| row.get(0),
                )?;

                match tx.execute(
                    "INSERT INTO turns (agent_id, position, role, content, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![agent, position, role.as_str(), json, created],
                ) {
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        return Ok(Err(position));
                    }
                    other => {
                        other?;
                    }
                }
                let id = tx.last_insert_rowid();

                if let Some(u) = recorded_usage {
                    tx.execute(
                        "INSERT INTO token_usages
                             (turn_id, agent_id, input, output, cached, thinking, total)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![
                            id,
                            agent,
                            u.input as i64,
                            u.output as i64,
                            u.cached as i64,
                            u.thinking as i64,
                            u.total as i64
                        ],
                    )?;
                }

                tx.commit()?;
                Ok(Ok((id, position)))
            })
            .await
            .map_err(StoreError::from)?;

        let (id, position) = inserted.map_err(|position| LogError::PositionConflict {
            agent_id: agent,
            position,
        })?;

        Ok(Turn {
            id,
            agent_id: agent,
            position,
            role,
            content,
            usage: recorded_usage,
            created_at,
        })
    }

    async fn find_turn(&self, agent: AgentId, id: TurnId) -> Result<Option<Turn>, LogError> {
        let raw = self
            .conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        &format!(
                            "SELECT {} {} WHERE t.agent_id = ?1 AND t.id = ?2",
                            TURN_COLUMNS, TURN_FROM
                        ),
                        params![agent, id],
                        TurnRow::read,
                    )
                    .optional()?)
            })
            .await
            .map_err(StoreError::from)?;

        raw.map(|row| row.into_turn().map_err(LogError::from))
            .transpose()
    }

    async fn token_usage(&self, agent: AgentId) -> Result<TokenUsage, LogError> {
        Ok(self
            .conn
            .call(move |conn| {
                Ok(conn.query_row(
                    "SELECT COALESCE(SUM(input), 0), COALESCE(SUM(output), 0),
                            COALESCE(SUM(cached), 0), COALESCE(SUM(thinking), 0),
                            COALESCE(SUM(total), 0)
                     FROM token_usages WHERE agent_id = ?1",
                    [agent],
                    |row| {
                        Ok(TokenUsage {
                            input: row.get::<_, i64>(0)? as u64,
                            output: row.get::<_, i64>(1)? as u64,
                            cached: row.get::<_, i64>(2)? as u64,
                            thinking: row.get::<_, i64>(3)? as u64,
                            total: row.get::<_, i64>(4)? as u64,
                        })
                    },
                )?)
            })
            .await
            .map_err(StoreError::from)?)
    }
}

#[async_trait]
impl EvolutionStore for SqliteStore {
    async fn current(&self, agent: AgentId) -> Result<Option<Evolution>, LogError> {
        Ok(self
            .conn
            .call(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, agent_id, instructions, created_at FROM evolutions
                         WHERE agent_id = ?1 ORDER BY id DESC LIMIT 1",
                        [agent],
                        rows::evolution,
                    )
                    .optional()?)
            })
            .await
            .map_err(StoreError::from)?)
    }

    async fn evolve(&self, agent: AgentId, instructions: String) -> Result<Evolution, LogError> {
        let created_at = Utc::now();
        let created = created_at.to_rfc3339();
        let text = instructions.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO evolutions (agent_id, instructions, created_at)
                     VALUES (?1, ?2, ?3)",
                    params![agent, text, created],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(StoreError::from)?;

        debug!("Recorded evolution {} for agent {}", id, agent);
        Ok(Evolution {
            id,
            agent_id: agent,
            instructions,
            created_at,
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
