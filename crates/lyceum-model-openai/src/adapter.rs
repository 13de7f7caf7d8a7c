//! OpenAI adapter implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lyceum_protocols::model::{validate_agent_content, validate_outbound};
use lyceum_protocols::{ModelAdapter, ModelError, ModelRequest, ModelResponse};

use crate::api::{ChatRequest, ChatResponse, ErrorBody};
use crate::converter::{convert_tool_choice, convert_tools, convert_turns};
use crate::models::limits;
use crate::parser::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// GPT models behind the Chat Completions API.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u64,
}

impl OpenAiAdapter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: limits(&model).max_output,
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

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ModelError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;
        Ok(self)
    }

    fn build_request(&self, request: &ModelRequest) -> ChatRequest {
        let tools = convert_tools(&request.catalog);
        ChatRequest {
            model: self.model.clone(),
            messages: convert_turns(&request.system, &request.turns),
            tool_choice: convert_tool_choice(request.tool_choice, !tools.is_empty()),
            tools,
            max_completion_tokens: self.max_output_tokens,
        }
    }

    async fn send(&self, body: &ChatRequest) -> Result<ChatResponse, ModelError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
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
impl ModelAdapter for OpenAiAdapter {
    fn id(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn run(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        validate_outbound(&request.turns)?;

        let body = self.build_request(&request);
        debug!(
            "OpenAI request: model={} messages={} tools={}",
            body.model,
            body.messages.len(),
            body.tools.len()
        );

        let response = self.send(&body).await?;
        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            debug!("OpenAI finish reason: {}", reason);
        }

        let parsed = parse_response(response)?;
        validate_agent_content(&parsed.content)?;
        Ok(parsed)
    }

    fn max_tokens(&self) -> u64 {
        limits(&self.model)
            .context
            .saturating_sub(self.max_output_tokens)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
