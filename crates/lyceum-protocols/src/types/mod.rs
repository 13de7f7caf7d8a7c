//! Shared types for the runtime.

mod agent;
mod turn;
mod usage;

pub use agent::*;
pub use turn::*;
pub use usage::*;

/// Storage identity of an agent.
pub type AgentId = i64;

/// Storage identity of a turn.
pub type TurnId = i64;
