use super::*;
use crate::schema::{ProviderConfig, ToolServerConfig};

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_validate_zero_concurrency() {
    let mut config = Config::default();
    config.runtime.tool_concurrency = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "runtime.tool_concurrency"));
}

#[test]
fn test_validate_high_concurrency_warning() {
    let mut config = Config::default();
    config.runtime.tool_concurrency = 500;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(!result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_base_url() {
    let mut config = Config::default();
    config.providers.insert(
        "openai".to_string(),
        ProviderConfig {
            api_key: Some("key".to_string()),
            base_url: Some("invalid-url".to_string()),
            ..Default::default()
        },
    );

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
}

#[test]
fn test_validate_missing_api_key_warns() {
    let mut config = Config::default();
    config
        .providers
        .insert("anthropic".to_string(), ProviderConfig::default());

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "providers.anthropic.api_key"));
}

#[test]
fn test_validate_unknown_provider_warns() {
    let mut config = Config::default();
    config.providers.insert(
        "mistral".to_string(),
        ProviderConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        },
    );

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "providers.mistral"));
}

#[test]
fn test_validate_gemini_is_known() {
    let mut config = Config::default();
    config.providers.insert(
        "gemini".to_string(),
        ProviderConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        },
    );

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_server_id_with_separator() {
    let mut config = Config::default();
    config
        .tool_servers
        .push(ToolServerConfig::stdio("my-sandbox", "sandbox-mcp"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors[0].message.contains("cannot contain '-'"));
}

#[test]
fn test_validate_duplicate_server_ids() {
    let mut config = Config::default();
    config
        .tool_servers
        .push(ToolServerConfig::stdio("sandbox", "a"));
    config
        .tool_servers
        .push(ToolServerConfig::http("sandbox", "http://localhost:1/mcp"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.message.contains("Duplicate")));
}

#[test]
fn test_validate_stdio_without_command() {
    let mut config = Config::default();
    let mut server = ToolServerConfig::stdio("sandbox", "x");
    server.command = None;
    config.tool_servers.push(server);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "tool_servers[0].command"));
}

#[test]
fn test_validate_http_bad_url() {
    let mut config = Config::default();
    config
        .tool_servers
        .push(ToolServerConfig::http("papers", "not a url"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "tool_servers[0].url"));
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.runtime.tool_concurrency = 0;

    let err = ConfigValidator::validate(&config)
        .unwrap()
        .into_result()
        .unwrap_err();
    assert!(err.to_string().contains("runtime.tool_concurrency"));
}
