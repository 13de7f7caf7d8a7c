//! # Lyceum Runtime
//!
//! Per-agent tick runtime: one tick turns a quantum of agent time into
//! render context → call model → execute tools → persist.
//!
//! ## Components
//!
//! - [`TickController`] - One agent's tick state machine
//! - [`ContextWindow`] - Loop-preserving truncation to the model budget
//! - [`ToolRouter`] - Namespaced, concurrent tool dispatch
//! - [`AgentDriver`] - Runs many agents' ticks in parallel
//! - [`AgentLeases`] - At most one live tick per agent

pub mod driver;
pub mod lease;
pub mod memory_store;
pub mod router;
pub mod self_edit;
pub mod status;
pub mod tick;
pub mod trace;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use driver::{AgentDriver, LoopReport, StopReason, TickReport};
pub use lease::{AgentLease, AgentLeases};
pub use memory_store::MemoryLog;
pub use router::ToolRouter;
pub use self_edit::{string_edit, InstructionsServer, INSTRUCTIONS_SERVER_ID};
pub use status::{StaticStatus, DEFAULT_STATUS};
pub use tick::{TickController, TickOutcome};
pub use trace::TraceLine;
pub use window::ContextWindow;
