//! Gemini adapter implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lyceum_protocols::model::{validate_agent_content, validate_outbound};
use lyceum_protocols::{ModelAdapter, ModelError, ModelRequest, ModelResponse};

use crate::api::{
    ErrorBody, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ThinkingConfig,
};
use crate::converter::{convert_system, convert_tool_choice, convert_tools, convert_turns};
use crate::models::limits;
use crate::parser::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini models behind the generateContent API.
pub struct GeminiAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u64,
    /// `None` lets thinking models size their own budget.
    thinking_budget: Option<u64>,
}

impl GeminiAdapter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: limits(&model).max_output,
            thinking_budget: None,
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

    /// Fixed thinking budget; 0 turns thinking off where the model allows it.
    pub fn with_thinking_budget(mut self, budget: u64) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ModelError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;
        Ok(self)
    }

    fn thinking_config(&self) -> Option<ThinkingConfig> {
        if !limits(&self.model).thinking {
            return None;
        }
        let budget = match self.thinking_budget {
            Some(budget) => i64::try_from(budget).unwrap_or(i64::MAX),
            None => -1,
        };
        Some(ThinkingConfig {
            thinking_budget: budget,
            include_thoughts: budget != 0,
        })
    }

    fn build_request(&self, request: &ModelRequest) -> GenerateContentRequest {
        let tools = convert_tools(&request.catalog);
        GenerateContentRequest {
            contents: convert_turns(&request.turns),
            system_instruction: convert_system(&request.system),
            tool_config: convert_tool_choice(request.tool_choice, !tools.is_empty()),
            tools,
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                thinking_config: self.thinking_config(),
            },
        }
    }

    async fn send(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
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
impl ModelAdapter for GeminiAdapter {
    fn id(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn run(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        validate_outbound(&request.turns)?;

        let body = self.build_request(&request);
        debug!(
            "Gemini request: model={} contents={} tools={}",
            self.model,
            body.contents.len(),
            body.tools.first().map_or(0, |t| t.function_declarations.len())
        );

        let response = self.send(&body).await?;
        if let Some(reason) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!("Gemini finish reason: {}", reason);
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
