//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::{Config, TransportKind};

/// Provider tags with an adapter implementation.
const KNOWN_PROVIDERS: [&str; 3] = ["anthropic", "openai", "gemini"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_runtime(config, &mut result);
        Self::validate_providers(config, &mut result);
        Self::validate_tool_servers(config, &mut result);

        Ok(result)
    }

    fn validate_runtime(config: &Config, result: &mut ValidationResult) {
        if config.runtime.tool_concurrency == 0 {
            result.add_error(ValidationError::new(
                "runtime.tool_concurrency",
                "tool_concurrency must be greater than 0",
            ));
        }

        if config.runtime.tool_concurrency > 64 {
            result.add_warning(ValidationWarning::new(
                "runtime.tool_concurrency",
                "tool_concurrency is very high (>64), tool backends may be overwhelmed",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            if !KNOWN_PROVIDERS.contains(&name.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}", name),
                    format!(
                        "Unknown provider '{}', valid values: {:?}",
                        name, KNOWN_PROVIDERS
                    ),
                ));
            }

            if provider.api_key.is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}.api_key", name),
                    "API key is not set, agents using this provider cannot tick",
                ));
            }

            if let Some(ref url) = provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }
        }
    }

    fn validate_tool_servers(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, server) in config.tool_servers.iter().enumerate() {
            let path = format!("tool_servers[{}]", i);

            if server.id.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    "Tool server id cannot be empty",
                ));
            } else if server.id.contains('-') {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    format!(
                        "Tool server id '{}' cannot contain '-', \
                         it separates server and tool names",
                        server.id
                    ),
                ));
            }

            if !seen.insert(server.id.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    format!("Duplicate tool server id '{}'", server.id),
                ));
            }

            match server.transport {
                TransportKind::Stdio => {
                    if server.command.as_deref().is_none_or(str::is_empty) {
                        result.add_error(ValidationError::new(
                            format!("{}.command", path),
                            "stdio transport requires a command",
                        ));
                    }
                }
                TransportKind::Http => match server.url.as_deref() {
                    None => result.add_error(ValidationError::new(
                        format!("{}.url", path),
                        "http transport requires a url",
                    )),
                    Some(url) => {
                        if url::Url::parse(url).is_err() {
                            result.add_error(ValidationError::new(
                                format!("{}.url", path),
                                format!("Invalid url '{}'", url),
                            ));
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
