//! # Lyceum Protocols
//!
//! Core data model and protocol definitions (traits) for the Lyceum agent
//! runtime. Contains only interface definitions and the types that flow
//! through them.
//!
//! ## Core Traits
//!
//! - [`ModelAdapter`] - One LLM vendor behind a normalized turn/block contract
//! - [`ToolServer`] - A namespaced source of tools (MCP or in-process)
//! - [`ConversationLog`] - Append-only, position-ordered turn storage
//! - [`EvolutionStore`] - Append-only history of an agent's instructions
//! - [`StatusSource`] - Text used to wake an idle agent

pub mod error;
pub mod log;
pub mod model;
pub mod status;
pub mod tool;
pub mod types;

pub use error::{LogError, ModelError, RuntimeError, ToolError};
pub use log::{ConversationLog, EvolutionStore};
pub use model::{ModelAdapter, ModelRequest, ModelResponse, ToolChoice};
pub use status::StatusSource;
pub use tool::{ToolCatalogEntry, ToolOutput, ToolServer, ToolSpec};
pub use types::*;
