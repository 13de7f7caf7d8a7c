//! Row mapping between SQLite and the protocol types.

use chrono::{DateTime, Utc};
use rusqlite::Row;

use lyceum_protocols::{AgentProfile, Block, Evolution, Experiment, Role, TokenUsage, Turn};

use crate::error::StoreError;

pub(crate) const TURN_COLUMNS: &str = "t.id, t.agent_id, t.position, t.role, t.content,
     t.created_at, u.input, u.output, u.cached, u.thinking, u.total";

pub(crate) const TURN_FROM: &str =
    "FROM turns t LEFT JOIN token_usages u ON u.turn_id = t.id";

pub(crate) fn timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

pub(crate) fn experiment(row: &Row<'_>) -> rusqlite::Result<Experiment> {
    let created: String = row.get(3)?;
    Ok(Experiment {
        id: row.get(0)?,
        name: row.get(1)?,
        problem: row.get(2)?,
        created_at: timestamp(&created),
    })
}

pub(crate) fn agent(row: &Row<'_>) -> rusqlite::Result<AgentProfile> {
    let created: String = row.get(5)?;
    Ok(AgentProfile {
        id: row.get(0)?,
        experiment_id: row.get(1)?,
        name: row.get(2)?,
        provider: row.get(3)?,
        model: row.get(4)?,
        created_at: timestamp(&created),
    })
}

pub(crate) fn evolution(row: &Row<'_>) -> rusqlite::Result<Evolution> {
    let created: String = row.get(3)?;
    Ok(Evolution {
        id: row.get(0)?,
        agent_id: row.get(1)?,
        instructions: row.get(2)?,
        created_at: timestamp(&created),
    })
}

/// A turn row before its JSON content is decoded.
pub(crate) struct TurnRow {
    id: i64,
    agent_id: i64,
    position: i64,
    role: String,
    content: String,
    created_at: String,
    usage: Option<TokenUsage>,
}

impl TurnRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        let input: Option<i64> = row.get(6)?;
        let usage = match input {
            Some(input) => Some(TokenUsage {
                input: input as u64,
                output: row.get::<_, i64>(7)? as u64,
                cached: row.get::<_, i64>(8)? as u64,
                thinking: row.get::<_, i64>(9)? as u64,
                total: row.get::<_, i64>(10)? as u64,
            }),
            None => None,
        };

        Ok(Self {
            id: row.get(0)?,
            agent_id: row.get(1)?,
            position: row.get(2)?,
            role: row.get(3)?,
            content: row.get(4)?,
            created_at: row.get(5)?,
            usage,
        })
    }

    pub(crate) fn into_turn(self) -> Result<Turn, StoreError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            StoreError::Serialization(format!("turn {} has unknown role {}", self.id, self.role))
        })?;
        let content: Vec<Block> = serde_json::from_str(&self.content)?;

        Ok(Turn {
            id: self.id,
            agent_id: self.agent_id,
            position: self.position,
            role,
            content,
            usage: self.usage,
            created_at: timestamp(&self.created_at),
        })
    }
}
