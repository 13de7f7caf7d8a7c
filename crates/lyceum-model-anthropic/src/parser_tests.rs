use super::*;
use serde_json::json;

fn response(value: serde_json::Value) -> MessagesResponse {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_parse_text_and_tool_use() {
    let parsed = parse_response(response(json!({
        "content": [
            {"type": "text", "text": "Let me look."},
            {"type": "tool_use", "id": "toolu_1", "name": "sandbox-execute", "input": {"cmd": "ls"}}
        ],
        "stop_reason": "tool_use",
        "usage": {"input_tokens": 10, "output_tokens": 4}
    })));

    assert_eq!(parsed.content.len(), 2);
    assert_eq!(parsed.content[0], Block::text("Let me look."));
    assert!(matches!(
        &parsed.content[1],
        Block::ToolUse { id, name, .. } if id == "toolu_1" && name == "sandbox-execute"
    ));
    assert_eq!(parsed.usage, Some(TokenUsage::new(10, 4)));
}

#[test]
fn test_parse_thinking_keeps_signature() {
    let parsed = parse_response(response(json!({
        "content": [
            {"type": "thinking", "thinking": "step one", "signature": "sig"},
            {"type": "redacted_thinking", "data": "blob"}
        ]
    })));

    assert_eq!(
        parsed.content[0],
        Block::Thinking {
            text: "step one".to_string(),
            signature: Some("sig".to_string()),
        }
    );
    assert_eq!(
        parsed.content[1],
        Block::Thinking {
            text: "<redacted>".to_string(),
            signature: Some("redacted:blob".to_string()),
        }
    );
    assert!(parsed.usage.is_none());
}

#[test]
fn test_unsupported_blocks_are_skipped() {
    let parsed = parse_response(response(json!({
        "content": [
            {"type": "server_tool_use", "id": "srv_1", "name": "web_search", "input": {}},
            {"type": "text", "text": "done"}
        ]
    })));
    assert_eq!(parsed.content, vec![Block::text("done")]);
}

#[test]
fn test_empty_content() {
    let parsed = parse_response(response(json!({"content": []})));
    assert!(parsed.is_empty());
}

#[test]
fn test_usage_counts_cache() {
    let usage: ApiUsage = serde_json::from_value(json!({
        "input_tokens": 100,
        "output_tokens": 50,
        "cache_creation_input_tokens": 20,
        "cache_read_input_tokens": 300
    }))
    .unwrap();
    let parsed = parse_usage(&usage);
    assert_eq!(parsed.input, 420);
    assert_eq!(parsed.cached, 300);
    assert_eq!(parsed.output, 50);
    assert_eq!(parsed.total, 470);
}
