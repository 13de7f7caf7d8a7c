//! Anthropic adapter implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lyceum_protocols::model::{validate_agent_content, validate_outbound};
use lyceum_protocols::{ModelAdapter, ModelError, ModelRequest, ModelResponse};

use crate::api::{ErrorBody, MessagesRequest, MessagesResponse, ThinkingConfig};
use crate::converter::{convert_tool_choice, convert_tools, convert_turns};
use crate::models::{context_window, default_max_output};
use crate::parser::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Claude behind the Messages API.
pub struct AnthropicAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u64,
    thinking_budget: u64,
}

impl AnthropicAdapter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: default_max_output(&model),
            thinking_budget: 0,
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u64) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Enable extended thinking with this many tokens; 0 disables it.
    pub fn with_thinking_budget(mut self, tokens: u64) -> Self {
        self.thinking_budget = tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ModelError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;
        Ok(self)
    }

    /// Tokens requested per call: the answer plus any thinking budget.
    fn request_max_tokens(&self) -> u64 {
        self.max_output_tokens + self.thinking_budget
    }

    fn build_request(&self, request: &ModelRequest) -> MessagesRequest {
        let tools = convert_tools(&request.catalog);
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.request_max_tokens(),
            system: request.system.clone(),
            messages: convert_turns(&request.turns),
            tool_choice: convert_tool_choice(request.tool_choice, !tools.is_empty()),
            tools,
            thinking: (self.thinking_budget > 0).then_some(ThinkingConfig {
                thinking_type: "enabled",
                budget_tokens: self.thinking_budget,
            }),
        }
    }

    async fn send(&self, body: &MessagesRequest) -> Result<MessagesResponse, ModelError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(ModelError::from_status(status.as_u16(), message));
        }

        serde_json::from_str(&text).map_err(|e| ModelError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ModelAdapter for AnthropicAdapter {
    fn id(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn run(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        validate_outbound(&request.turns)?;

        let body = self.build_request(&request);
        debug!(
            "Anthropic request: model={} messages={} tools={}",
            body.model,
            body.messages.len(),
            body.tools.len()
        );

        let response = self.send(&body).await?;
        if let Some(ref reason) = response.stop_reason {
            debug!("Anthropic stop reason: {}", reason);
        }

        let parsed = parse_response(response);
        validate_agent_content(&parsed.content)?;
        Ok(parsed)
    }

    fn max_tokens(&self) -> u64 {
        context_window(&self.model).saturating_sub(self.request_max_tokens())
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
