//! Per-agent tick leases.
//!
//! Two ticks of the same agent would race on log positions, so every tick
//! and replay holds the agent's lease for its whole duration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use lyceum_protocols::{AgentId, RuntimeError};

static GLOBAL_LEASES: Lazy<AgentLeases> = Lazy::new(AgentLeases::new);

/// Registry of agents that currently have a live tick.
#[derive(Clone, Default)]
pub struct AgentLeases {
    held: Arc<DashMap<AgentId, DateTime<Utc>>>,
}

impl AgentLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry shared by every controller that is not given one.
    pub fn global() -> Self {
        GLOBAL_LEASES.clone()
    }

    /// Take the lease for an agent, failing if it is already held.
    pub fn acquire(&self, agent: AgentId) -> Result<AgentLease, RuntimeError> {
        match self.held.entry(agent) {
            Entry::Occupied(_) => Err(RuntimeError::AgentBusy(agent)),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                debug!("Lease acquired for agent {}", agent);
                Ok(AgentLease {
                    agent,
                    held: self.held.clone(),
                })
            }
        }
    }

    pub fn is_held(&self, agent: AgentId) -> bool {
        self.held.contains_key(&agent)
    }

    /// When the current lease of an agent was taken.
    pub fn held_since(&self, agent: AgentId) -> Option<DateTime<Utc>> {
        self.held.get(&agent).map(|since| *since)
    }
}

/// Released on drop.
pub struct AgentLease {
    agent: AgentId,
    held: Arc<DashMap<AgentId, DateTime<Utc>>>,
}

impl AgentLease {
    pub fn agent(&self) -> AgentId {
        self.agent
    }
}

impl Drop for AgentLease {
    fn drop(&mut self) {
        self.held.remove(&self.agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let leases = AgentLeases::new();
        let lease = leases.acquire(1).unwrap();
        assert_eq!(lease.agent(), 1);
        assert!(leases.is_held(1));

        let err = leases.acquire(1).err().unwrap();
        assert!(matches!(err, RuntimeError::AgentBusy(1)));
    }

    #[test]
    fn test_release_on_drop() {
        let leases = AgentLeases::new();
        {
            let _lease = leases.acquire(7).unwrap();
            assert!(leases.held_since(7).is_some());
        }
        assert!(!leases.is_held(7));
        assert!(leases.acquire(7).is_ok());
    }

    #[test]
    fn test_agents_are_independent() {
        let leases = AgentLeases::new();
        let _a = leases.acquire(1).unwrap();
        let _b = leases.acquire(2).unwrap();
        assert!(leases.is_held(1));
        assert!(leases.is_held(2));
    }

    #[test]
    fn test_clones_share_state() {
        let leases = AgentLeases::new();
        let other = leases.clone();
        let _lease = leases.acquire(3).unwrap();
        assert!(other.acquire(3).is_err());
    }
}
