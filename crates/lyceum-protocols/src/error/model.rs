//! Model adapter errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl ModelError {
    /// Map a non-success HTTP status from a provider.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 | 529 => ModelError::RateLimited(message),
            _ => ModelError::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_network() {
        let err = ModelError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Network error"));
    }

    #[test]
    fn test_model_error_api() {
        let err = ModelError::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_model_error_rate_limited() {
        let err = ModelError::RateLimited("slow down".to_string());
        assert!(err.to_string().contains("Rate limited"));
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ModelError::from_status(429, "slow down"),
            ModelError::RateLimited(_)
        ));
        assert!(matches!(
            ModelError::from_status(401, "bad key"),
            ModelError::Api { status: 401, .. }
        ));
    }

    #[test]
    fn test_model_error_malformed() {
        let err = ModelError::MalformedResponse("missing content".to_string());
        assert!(err.to_string().contains("Malformed response"));
    }

    #[test]
    fn test_model_error_invalid_request() {
        let err = ModelError::InvalidRequest("text before tool result".to_string());
        assert!(err.to_string().contains("Invalid request"));
    }

    #[test]
    fn test_model_error_not_configured() {
        let err = ModelError::NotConfigured("anthropic".to_string());
        assert!(err.to_string().contains("not configured"));
        assert!(err.to_string().contains("anthropic"));
    }
}
