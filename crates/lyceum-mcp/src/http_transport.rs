//! HTTP transport for MCP communication.
//!
//! Each request is a POST. Servers may answer with a plain JSON body or with
//! a short `text/event-stream` body carrying the response as a `data:` event.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use tokio::sync::Mutex;
use tracing::debug;

use crate::protocol::{RpcNotification, RpcRequest, RpcResponse};
use crate::transport::{Transport, TransportError};

const SESSION_HEADER: &str = "mcp-session-id";

/// HTTP transport for MCP servers.
pub struct HttpTransport {
    client: Client,
    url: String,
    authorization: Option<String>,
    headers: HashMap<String, String>,
    session: Mutex<Option<String>>,
    closed: AtomicBool,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            authorization: None,
            headers: HashMap::new(),
            session: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Authorization header value, e.g. `Bearer <token>`.
    pub fn with_authorization(mut self, authorization: Option<String>) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    async fn post<T: serde::Serialize + Sync>(&self, body: &T) -> Result<Response, TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }

        let mut req = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json, text/event-stream");

        if let Some(ref auth) = self.authorization {
            req = req.header(header::AUTHORIZATION, auth);
        }
        if let Some(ref session) = *self.session.lock().await {
            req = req.header(SESSION_HEADER, session);
        }
        for (key, value) in &self.headers {
            req = req.header(key, value);
        }

        let response = req
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {}: {}", status, text)));
        }

        if let Some(session) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            *self.session.lock().await = Some(session.to_string());
        }

        Ok(response)
    }
}

/// Find the response for `request` among the `data:` events of a stream body.
fn response_from_events(body: &str, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
    for line in body.lines() {
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        match serde_json::from_str::<RpcResponse>(data.trim()) {
            Ok(response) if response.id == request.id => return Ok(response),
            Ok(_) | Err(_) => debug!("Skipping event: {}", data.trim()),
        }
    }
    Err(TransportError::NoResponse(format!("{:?}", request.id)))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: RpcRequest) -> Result<RpcResponse, TransportError> {
        let response = self.post(&request).await?;

        let is_stream = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        if is_stream {
            response_from_events(&body, &request)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    async fn notify(&self, notification: RpcNotification) -> Result<(), TransportError> {
        self.post(&notification).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::methods;
    use serde_json::json;
    use wiremock::matchers::{header as header_is, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(format!("{}/mcp", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_json_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mcp"))
            .and(header_is("authorization", "Bearer t0k"))
            .and(header_is("x-team", "red"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": {"tools": []}
            })))
            .mount(&server)
            .await;

        let transport = transport(&server)
            .with_authorization(Some("Bearer t0k".to_string()))
            .with_headers(HashMap::from([("x-team".to_string(), "red".to_string())]));
        let response = transport
            .request(RpcRequest::new(1, methods::LIST_TOOLS))
            .await
            .unwrap();
        assert!(response.into_result().unwrap()["tools"].is_array());
    }

    #[tokio::test]
    async fn test_event_stream_response() {
        let server = MockServer::start().await;
        let body = "event: message\n\
                    data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\"}\n\n\
                    event: message\n\
                    data: {\"jsonrpc\":\"2.0\",\"id\":4,\"result\":{\"ok\":true}}\n\n";
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"),
            )
            .mount(&server)
            .await;

        let response = transport(&server)
            .request(RpcRequest::new(4, methods::CALL_TOOL))
            .await
            .unwrap();
        assert_eq!(response.into_result().unwrap()["ok"], true);
    }

    #[tokio::test]
    async fn test_session_header_is_echoed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header_is(SESSION_HEADER, "s-1"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(SESSION_HEADER, "s-1")
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
            )
            .mount(&server)
            .await;

        let transport = transport(&server);
        transport
            .request(RpcRequest::new(1, methods::INITIALIZE))
            .await
            .unwrap();
        transport
            .notify(RpcNotification::new(methods::INITIALIZED))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .request(RpcRequest::new(1, methods::LIST_TOOLS))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(ref m) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_closed_transport_returns_error() {
        let transport =
            HttpTransport::new("http://localhost:1/mcp", Duration::from_secs(1)).unwrap();
        transport.close().await.unwrap();
        let result = transport.request(RpcRequest::new(1, methods::LIST_TOOLS)).await;
        assert!(matches!(result, Err(TransportError::Closed)));
    }

    #[test]
    fn test_events_without_match() {
        let request = RpcRequest::new(2, methods::LIST_TOOLS);
        let events = "data: {\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{}}\n";
        let result = response_from_events(events, &request);
        assert!(matches!(result, Err(TransportError::NoResponse(_))));
    }
}
