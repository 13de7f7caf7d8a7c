//! Default status text for synthetic user turns.

use async_trait::async_trait;

use lyceum_protocols::{AgentProfile, RuntimeError, StatusSource};

pub const DEFAULT_STATUS: &str = "This is an automated system message. There is no user available \
to respond. Proceed autonomously, making sure to use tools to make progress on your research.";

/// A status source that always returns the same text.
#[derive(Debug, Clone)]
pub struct StaticStatus {
    text: String,
}

impl StaticStatus {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for StaticStatus {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS)
    }
}

#[async_trait]
impl StatusSource for StaticStatus {
    async fn status(&self, _agent: &AgentProfile) -> Result<String, RuntimeError> {
        Ok(self.text.clone())
    }
}
