//! Construction of model adapters, tool servers and tick controllers from
//! configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use lyceum_config::{Config, ProviderConfig, ToolServerConfig};
use lyceum_mcp::McpToolServer;
use lyceum_model_anthropic::AnthropicAdapter;
use lyceum_model_gemini::GeminiAdapter;
use lyceum_model_openai::OpenAiAdapter;
use lyceum_protocols::{
    AgentProfile, ConversationLog, EvolutionStore, Experiment, ModelAdapter, ModelError,
    ProviderKind, StatusSource, ToolServer,
};
use lyceum_runtime::{InstructionsServer, StaticStatus, TickController, ToolRouter};
use lyceum_store_sqlite::SqliteStore;

/// Build the adapter for an agent's stored provider tag.
pub(crate) fn build_model(
    config: &Config,
    agent: &AgentProfile,
) -> Result<Arc<dyn ModelAdapter>, ModelError> {
    let kind = ProviderKind::parse(&agent.provider).ok_or_else(|| {
        ModelError::NotConfigured(format!("unknown provider '{}'", agent.provider))
    })?;
    let provider = config
        .providers
        .get(kind.as_str())
        .ok_or_else(|| ModelError::NotConfigured(format!("no [providers.{}] section", kind)))?;
    let api_key = provider.api_key.clone().ok_or_else(|| {
        ModelError::NotConfigured(format!("providers.{}.api_key is not set", kind))
    })?;
    let timeout = Duration::from_secs(provider.timeout_seconds);
    let model = agent.model.as_str();

    let adapter: Arc<dyn ModelAdapter> = match kind {
        ProviderKind::Anthropic => {
            Arc::new(anthropic(provider, api_key, model).with_timeout(timeout)?)
        }
        ProviderKind::OpenAi => Arc::new(openai(provider, api_key, model).with_timeout(timeout)?),
        ProviderKind::Gemini => Arc::new(gemini(provider, api_key, model).with_timeout(timeout)?),
    };
    Ok(adapter)
}

fn anthropic(provider: &ProviderConfig, api_key: String, model: &str) -> AnthropicAdapter {
    let mut adapter = AnthropicAdapter::new(api_key, model);
    if let Some(ref url) = provider.base_url {
        adapter = adapter.with_base_url(url.as_str());
    }
    if let Some(tokens) = provider.max_output_tokens {
        adapter = adapter.with_max_output_tokens(u64::from(tokens));
    }
    if let Some(budget) = provider.thinking_budget {
        adapter = adapter.with_thinking_budget(u64::from(budget));
    }
    adapter
}

fn openai(provider: &ProviderConfig, api_key: String, model: &str) -> OpenAiAdapter {
    let mut adapter = OpenAiAdapter::new(api_key, model);
    if let Some(ref url) = provider.base_url {
        adapter = adapter.with_base_url(url.as_str());
    }
    if let Some(tokens) = provider.max_output_tokens {
        adapter = adapter.with_max_output_tokens(u64::from(tokens));
    }
    if provider.thinking_budget.is_some_and(|b| b > 0) {
        warn!("thinking_budget is ignored for the openai provider");
    }
    adapter
}

fn gemini(provider: &ProviderConfig, api_key: String, model: &str) -> GeminiAdapter {
    let mut adapter = GeminiAdapter::new(api_key, model);
    if let Some(ref url) = provider.base_url {
        adapter = adapter.with_base_url(url.as_str());
    }
    if let Some(tokens) = provider.max_output_tokens {
        adapter = adapter.with_max_output_tokens(u64::from(tokens));
    }
    if let Some(budget) = provider.thinking_budget {
        adapter = adapter.with_thinking_budget(u64::from(budget));
    }
    adapter
}

/// One agent's MCP connections. Servers are never shared between agents.
pub(crate) struct ToolServers {
    servers: Vec<Arc<McpToolServer>>,
}

impl ToolServers {
    /// Connect every configured server on behalf of one agent, telling each
    /// server who is calling. Any failure aborts startup.
    pub async fn connect(
        configs: &[ToolServerConfig],
        experiment: &Experiment,
        agent: &AgentProfile,
    ) -> anyhow::Result<Self> {
        let mut servers = Vec::with_capacity(configs.len());
        for config in configs {
            let scoped = config.for_agent(&experiment.name, &agent.name);
            let server = McpToolServer::connect(&scoped).await.with_context(|| {
                format!("Failed to connect tool server '{}' for agent '{}'", config.id, agent.name)
            })?;
            info!("Connected tool server {} for agent {}", config.id, agent.name);
            servers.push(Arc::new(server));
        }
        Ok(Self { servers })
    }

    /// The agent's router: its servers plus its instructions server.
    pub fn router(
        &self,
        config: &Config,
        agent: &AgentProfile,
        evolutions: Arc<dyn EvolutionStore>,
    ) -> ToolRouter {
        let mut router = ToolRouter::new().with_concurrency(config.runtime.tool_concurrency);
        for server in &self.servers {
            router.register(Arc::clone(server) as Arc<dyn ToolServer>);
        }
        if config.runtime.self_edit {
            router.register(Arc::new(InstructionsServer::new(agent.id, evolutions)));
        }
        router
    }

    pub async fn shutdown(&self) {
        for server in &self.servers {
            if let Err(e) = server.shutdown().await {
                warn!("Failed to shut down tool server {}: {}", server.id(), e);
            }
        }
    }
}

/// The idle-agent status message from configuration.
pub(crate) fn status_source(config: &Config) -> Arc<dyn StatusSource> {
    match config.runtime.status_text {
        Some(ref text) => Arc::new(StaticStatus::new(text.as_str())),
        None => Arc::new(StaticStatus::default()),
    }
}

/// Wire one agent's controller over the shared store and its tool servers.
pub(crate) fn build_controller(
    config: &Config,
    store: &Arc<SqliteStore>,
    servers: &ToolServers,
    experiment: &Experiment,
    agent: AgentProfile,
) -> anyhow::Result<TickController> {
    let model = build_model(config, &agent)
        .with_context(|| format!("Cannot build a model adapter for agent '{}'", agent.name))?;
    let log: Arc<dyn ConversationLog> = store.clone();
    let evolutions: Arc<dyn EvolutionStore> = store.clone();
    let router = servers.router(config, &agent, Arc::clone(&evolutions));

    Ok(TickController::new(
        agent,
        experiment.problem.as_str(),
        log,
        evolutions,
        model,
        Arc::new(router),
    )
    .with_status(status_source(config)))
}
