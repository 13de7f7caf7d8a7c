use super::*;
use crate::test_support::EchoServer;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn call(id: &str, name: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        input: json!({"cmd": "ls"}),
    }
}

#[tokio::test]
async fn test_catalog_qualifies_names() {
    let router = ToolRouter::new()
        .with_server(EchoServer::new("sandbox", &["execute"]).into_arc())
        .with_server(EchoServer::new("papers", &["submit", "review"]).into_arc());

    let catalog = router.catalog().await.unwrap();
    let names: Vec<_> = catalog.iter().map(|e| e.qualified_name.as_str()).collect();
    assert_eq!(names, vec!["sandbox-execute", "papers-submit", "papers-review"]);
}

#[tokio::test]
async fn test_catalog_fails_when_any_server_fails() {
    let router = ToolRouter::new()
        .with_server(EchoServer::new("sandbox", &["execute"]).into_arc())
        .with_server(EchoServer::new("papers", &["submit"]).failing_listing().into_arc());

    let err = router.catalog().await.unwrap_err();
    match err {
        RuntimeError::ToolCatalog { server, .. } => assert_eq!(server, "papers"),
        other => panic!("Expected ToolCatalog error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_skips_duplicate_local_names() {
    let server = EchoServer::new("sandbox", &["execute", "execute"]).into_arc();
    let router = ToolRouter::new().with_server(server);
    let catalog = router.catalog().await.unwrap();
    assert_eq!(catalog.len(), 1);
}

#[tokio::test]
async fn test_routes_only_to_owning_server() {
    let sandbox = EchoServer::new("sandbox", &["execute"]).into_arc();
    let other = EchoServer::new("papers", &["execute"]).into_arc();
    let router = ToolRouter::new()
        .with_server(other.clone())
        .with_server(sandbox.clone());

    let result = router.execute(&call("t1", "sandbox-execute")).await;
    assert!(!result.is_error);
    assert_eq!(result.tool_use_id, "t1");
    assert_eq!(result.tool_name, "sandbox-execute");
    assert!(result.content.starts_with("execute:"));
    assert_eq!(sandbox.calls.load(Ordering::SeqCst), 1);
    assert_eq!(other.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_tool_is_error_result() {
    let router = ToolRouter::new().with_server(EchoServer::new("sandbox", &["execute"]).into_arc());

    for name in ["sandbox-delete", "nobody-execute", "execute", "sandboxexecute"] {
        let result = router.execute(&call("t1", name)).await;
        assert!(result.is_error, "{} should not resolve", name);
        assert!(result.content.starts_with("Error [tool_not_found_error]"));
    }
}

#[tokio::test]
async fn test_backend_failure_is_error_result() {
    let router = ToolRouter::new().with_server(
        EchoServer::new("sandbox", &["execute"])
            .failing_tool("execute")
            .into_arc(),
    );

    let result = router.execute(&call("t1", "sandbox-execute")).await;
    assert!(result.is_error);
    assert!(result.content.contains("tool_execution_error"));
    assert!(result.content.contains("backend exploded"));
}

#[tokio::test]
async fn test_listing_failure_during_dispatch_is_not_found() {
    let router = ToolRouter::new()
        .with_server(EchoServer::new("sandbox", &["execute"]).failing_listing().into_arc());

    let result = router.execute(&call("t1", "sandbox-execute")).await;
    assert!(result.is_error);
    assert!(result.content.contains("tool_not_found_error"));
}

#[tokio::test]
async fn test_execute_all_keeps_input_order() {
    let router = ToolRouter::new()
        .with_server(EchoServer::new("sandbox", &["execute"]).into_arc())
        .with_server(EchoServer::new("papers", &["submit"]).into_arc());

    let calls = vec![
        call("a", "papers-submit"),
        call("b", "missing-tool"),
        call("c", "sandbox-execute"),
    ];
    let results = router.execute_all(&calls).await;
    let ids: Vec<_> = results.iter().map(|r| r.tool_use_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(!results[0].is_error);
    assert!(results[1].is_error);
    assert!(!results[2].is_error);
}

#[tokio::test]
async fn test_execute_all_respects_concurrency_cap() {
    let server = EchoServer::new("sandbox", &["execute"])
        .with_delay(Duration::from_millis(20))
        .into_arc();
    let router = ToolRouter::new()
        .with_concurrency(3)
        .with_server(server.clone());

    let calls: Vec<_> = (0..10)
        .map(|i| call(&format!("t{}", i), "sandbox-execute"))
        .collect();
    let results = router.execute_all(&calls).await;

    assert_eq!(results.len(), 10);
    assert_eq!(server.calls.load(Ordering::SeqCst), 10);
    let peak = server.peak_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak {} exceeded cap", peak);
    assert!(peak > 1, "calls did not overlap");
}

#[test]
fn test_concurrency_floor() {
    let router = ToolRouter::new().with_concurrency(0);
    assert_eq!(router.concurrency(), 1);
    assert_eq!(ToolRouter::new().concurrency(), 8);
}

#[test]
fn test_local_name() {
    assert_eq!(local_name("sandbox", "sandbox-execute"), Some("execute"));
    assert_eq!(local_name("sandbox", "sandbox-run-all"), Some("run-all"));
    assert_eq!(local_name("sandbox", "sandboxexecute"), None);
    assert_eq!(local_name("sand", "sandbox-execute"), None);
}
