use super::*;
use serde_json::json;

fn turn(position: i64, role: Role, content: Vec<Block>) -> Turn {
    Turn {
        id: position + 100,
        agent_id: 1,
        position,
        role,
        content,
        usage: None,
        created_at: Utc::now(),
    }
}

fn tool_use(id: &str) -> Block {
    Block::ToolUse {
        id: id.to_string(),
        name: "sandbox-execute".to_string(),
        input: json!({"cmd": "ls"}),
    }
}

#[test]
fn test_role_parse() {
    assert_eq!(Role::parse("user"), Some(Role::User));
    assert_eq!(Role::parse("agent"), Some(Role::Agent));
    assert_eq!(Role::parse("assistant"), None);
    assert_eq!(Role::Agent.to_string(), "agent");
}

#[test]
fn test_block_serialization_tags() {
    let block = Block::ToolResult {
        tool_use_id: "t1".to_string(),
        tool_name: "sandbox-execute".to_string(),
        content: "ok".to_string(),
        is_error: false,
    };
    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(value["type"], "tool_result");
    assert_eq!(value["tool_use_id"], "t1");
}

#[test]
fn test_thinking_signature_omitted_when_absent() {
    let block = Block::Thinking {
        text: "hmm".to_string(),
        signature: None,
    };
    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(value["type"], "thinking");
    assert!(value.get("signature").is_none());

    let parsed: Block = serde_json::from_value(json!({"type": "thinking", "text": "x"})).unwrap();
    assert_eq!(
        parsed,
        Block::Thinking {
            text: "x".to_string(),
            signature: None
        }
    );
}

#[test]
fn test_loop_boundary_requires_all_text_user_turn() {
    assert!(turn(0, Role::User, vec![Block::text("wake up")]).is_loop_boundary());
    assert!(!turn(1, Role::Agent, vec![Block::text("hi")]).is_loop_boundary());
    assert!(!turn(2, Role::User, vec![]).is_loop_boundary());

    let results = turn(
        3,
        Role::User,
        vec![ToolResult::success(&tool_use("a").as_tool_call().unwrap(), "ok").into()],
    );
    assert!(!results.is_loop_boundary());
    assert!(results.has_tool_results());
}

#[test]
fn test_tool_calls_in_block_order() {
    let t = turn(
        1,
        Role::Agent,
        vec![
            Block::text("let me look"),
            tool_use("a"),
            tool_use("b"),
        ],
    );
    let calls = t.tool_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].id, "a");
    assert_eq!(calls[1].id, "b");
    assert!(t.has_tool_calls());
}

#[test]
fn test_tool_result_into_block() {
    let call = tool_use("z").as_tool_call().unwrap();
    let block: Block = ToolResult::error(&call, "boom").into();
    match block {
        Block::ToolResult {
            tool_use_id,
            is_error,
            ..
        } => {
            assert_eq!(tool_use_id, "z");
            assert!(is_error);
        }
        _ => panic!("Expected tool result block"),
    }
}

#[test]
fn test_turn_usage_skipped_when_none() {
    let t = turn(0, Role::User, vec![Block::text("x")]);
    let value = serde_json::to_value(&t).unwrap();
    assert!(value.get("usage").is_none());
}
