//! Status text used to build the synthetic user turn that opens a loop.

use async_trait::async_trait;

use crate::error::RuntimeError;
use crate::types::AgentProfile;

/// Supplies what an idle agent is told when a new loop starts.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn status(&self, agent: &AgentProfile) -> Result<String, RuntimeError>;
}
