use super::*;
use chrono::Utc;
use serde_json::json;

fn turn(position: i64, role: Role, content: Vec<Block>) -> Turn {
    Turn {
        id: position + 1,
        agent_id: 1,
        position,
        role,
        content,
        usage: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_roles_map_to_user_and_assistant() {
    let messages = convert_turns(&[
        turn(0, Role::User, vec![Block::text("start")]),
        turn(1, Role::Agent, vec![Block::text("ok")]),
    ]);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "user");
    assert_eq!(messages[1].role, "assistant");
}

#[test]
fn test_tool_round_trip_blocks() {
    let messages = convert_turns(&[
        turn(
            0,
            Role::Agent,
            vec![Block::ToolUse {
                id: "toolu_1".to_string(),
                name: "sandbox-execute".to_string(),
                input: json!({"cmd": "ls"}),
            }],
        ),
        turn(
            1,
            Role::User,
            vec![Block::ToolResult {
                tool_use_id: "toolu_1".to_string(),
                tool_name: "sandbox-execute".to_string(),
                content: "Error [tool_execution_error]: boom".to_string(),
                is_error: true,
            }],
        ),
    ]);

    let value = serde_json::to_value(&messages).unwrap();
    assert_eq!(value[0]["content"][0]["type"], "tool_use");
    assert_eq!(value[0]["content"][0]["name"], "sandbox-execute");
    assert_eq!(value[1]["content"][0]["type"], "tool_result");
    assert_eq!(value[1]["content"][0]["tool_use_id"], "toolu_1");
    assert_eq!(value[1]["content"][0]["is_error"], true);
    assert!(value[1]["content"][0].get("tool_name").is_none());
}

#[test]
fn test_signed_thinking_is_replayed() {
    let block = Block::Thinking {
        text: "consider".to_string(),
        signature: Some("sig-abc".to_string()),
    };
    assert_eq!(
        convert_block(&block),
        Some(ContentBlock::Thinking {
            thinking: "consider".to_string(),
            signature: "sig-abc".to_string(),
        })
    );
}

#[test]
fn test_redacted_thinking_is_replayed() {
    let block = Block::Thinking {
        text: "<redacted>".to_string(),
        signature: Some(format!("{}opaque", REDACTED_PREFIX)),
    };
    assert_eq!(
        convert_block(&block),
        Some(ContentBlock::RedactedThinking {
            data: "opaque".to_string()
        })
    );
}

#[test]
fn test_unsigned_thinking_only_turn_is_dropped() {
    let messages = convert_turns(&[turn(
        0,
        Role::Agent,
        vec![Block::Thinking {
            text: "from another vendor".to_string(),
            signature: None,
        }],
    )]);
    assert!(messages.is_empty());
}

#[test]
fn test_tools_use_qualified_names() {
    let catalog = vec![ToolCatalogEntry {
        qualified_name: "instructions-edit".to_string(),
        description: "Edit instructions".to_string(),
        input_schema: json!({"type": "object"}),
    }];
    let tools = convert_tools(&catalog);
    assert_eq!(tools[0].name, "instructions-edit");
    assert_eq!(tools[0].input_schema["type"], "object");
}

#[test]
fn test_tool_choice() {
    assert_eq!(convert_tool_choice(ToolChoice::Auto, false), None);
    assert_eq!(
        convert_tool_choice(ToolChoice::Any, true).unwrap().choice_type,
        "any"
    );
    assert_eq!(
        convert_tool_choice(ToolChoice::None, true).unwrap().choice_type,
        "none"
    );
}
