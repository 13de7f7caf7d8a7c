//! Anthropic Messages API wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub system: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ApiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ApiToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
        signature: String,
    },
    RedactedThinking {
        data: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
    /// Server-side tool traffic and future block types.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Serialize)]
pub struct ApiTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ApiToolChoice {
    #[serde(rename = "type")]
    pub choice_type: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ThinkingConfig {
    #[serde(rename = "type")]
    pub thinking_type: &'static str,
    pub budget_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
}

/// `{"type": "error", "error": {"type": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_skips_empty_fields() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            system: String::new(),
            messages: vec![],
            tools: vec![],
            tool_choice: None,
            thinking: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["max_tokens"], 1024);
        assert!(value.get("system").is_none());
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("thinking").is_none());
    }

    #[test]
    fn test_tool_result_error_flag_only_when_set() {
        let ok = ContentBlock::ToolResult {
            tool_use_id: "t1".to_string(),
            content: "fine".to_string(),
            is_error: false,
        };
        assert!(serde_json::to_value(&ok).unwrap().get("is_error").is_none());

        let failed = ContentBlock::ToolResult {
            tool_use_id: "t1".to_string(),
            content: "boom".to_string(),
            is_error: true,
        };
        assert_eq!(serde_json::to_value(&failed).unwrap()["is_error"], true);
    }

    #[test]
    fn test_unknown_block_types_deserialize() {
        let block: ContentBlock =
            serde_json::from_value(json!({"type": "server_tool_use", "id": "x"})).unwrap();
        assert_eq!(block, ContentBlock::Unsupported);
    }

    #[test]
    fn test_usage_cache_fields_optional() {
        let usage: ApiUsage =
            serde_json::from_value(json!({"input_tokens": 5, "output_tokens": 2})).unwrap();
        assert_eq!(usage.input_tokens, 5);
        assert!(usage.cache_read_input_tokens.is_none());
    }

    #[test]
    fn test_error_body() {
        let body: ErrorBody = serde_json::from_value(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        }))
        .unwrap();
        assert_eq!(body.error.message, "Overloaded");
    }
}
