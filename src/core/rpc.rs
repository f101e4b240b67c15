/// JSON-RPC Envelope Handler
///
/// Decodes JSON-RPC 2.0 requests, routes the three MCP methods this server
/// implements (`initialize`, `tools/list`, `tools/call`) and builds the
/// response envelope. Transport-agnostic: the HTTP and STDIO servers both
/// feed raw messages into `McpHandler`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::error::RpcError;
use crate::tools::catalog::ToolCatalog;
use crate::tools::dispatch::ToolInvocation;
use crate::tools::{ToolDispatcher, ToolError};

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request.
///
/// `id` is kept as an opaque value and echoed back verbatim; an absent id
/// decodes to `null`.
#[derive(Deserialize, Debug)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Decode a request, rejecting anything that does not declare
    /// `"jsonrpc": "2.0"` or has wrongly-typed members.
    pub fn from_value(message: Value) -> Result<Self, RpcError> {
        if !message.is_object() {
            return Err(RpcError::InvalidEnvelope);
        }
        let request: JsonRpcRequest =
            serde_json::from_value(message).map_err(|_| RpcError::InvalidEnvelope)?;
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(RpcError::InvalidEnvelope);
        }
        Ok(request)
    }
}

/// JSON-RPC 2.0 response. Exactly one of `result` / `error` is set.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }
}

/// Server identity reported by `initialize`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Shared request handler: one instance per process, used concurrently by
/// every connection. Holds no mutable state.
pub struct McpHandler {
    server_info: ServerInfo,
    catalog: ToolCatalog,
    dispatcher: ToolDispatcher,
}

impl McpHandler {
    pub fn new(server_info: ServerInfo, dispatcher: ToolDispatcher) -> Self {
        Self {
            server_info,
            catalog: ToolCatalog::new(),
            dispatcher,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Handle a raw request body. Unparseable input yields an error
    /// response with a `null` id since none can be recovered.
    pub async fn handle_body(&self, body: &[u8]) -> JsonRpcResponse {
        match serde_json::from_slice::<Value>(body) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => {
                warn!(error = %e, "unparseable JSON-RPC body");
                JsonRpcResponse::failure(Value::Null, &RpcError::Parse(e))
            }
        }
    }

    /// Handle one decoded JSON message.
    pub async fn handle_message(&self, message: Value) -> JsonRpcResponse {
        let request = match JsonRpcRequest::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!("rejecting malformed JSON-RPC request");
                return JsonRpcResponse::failure(Value::Null, &e);
            }
        };

        debug!(method = %request.method, id = %request.id, "handling request");
        let id = request.id.clone();
        match self.route(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::failure(id, &e),
        }
    }

    async fn route(&self, request: JsonRpcRequest) -> Result<Value, RpcError> {
        match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "tools/list" => Ok(json!({ "tools": self.catalog.tools() })),
            "tools/call" => self.call_tool(&request.params).await,
            other => Err(RpcError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": self.server_info
        })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, RpcError> {
        let invocation = ToolInvocation::from_params(params)?;
        let result = self
            .dispatcher
            .invoke(&invocation.name, &invocation.arguments)
            .await?;
        let text = serde_json::to_string_pretty(&result).map_err(ToolError::from)?;

        Ok(json!({
            "content": [
                {
                    "type": "text",
                    "text": text
                }
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{INTERNAL_ERROR, METHOD_NOT_FOUND};
    use crate::reddit::models::PostType;
    use crate::reddit::{MockRedditApi, Post};
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn handler(mock: MockRedditApi) -> McpHandler {
        McpHandler::new(
            ServerInfo {
                name: "mcp-reddit".to_string(),
                version: "0.2.0".to_string(),
            },
            ToolDispatcher::new(Arc::new(mock)),
        )
    }

    fn synthetic_posts(count: usize) -> Vec<Post> {
        (0..count)
            .map(|i| Post {
                id: format!("p{}", i),
                title: format!("Synthetic {}", i),
                author: "stub".to_string(),
                score: i as i64,
                subreddit: "all".to_string(),
                url: format!("https://example.com/{}", i),
                created_at: DateTime::from_timestamp(1_700_000_000 + i as i64, 0).unwrap(),
                comment_count: 0,
                post_type: PostType::Link,
                content: Some(format!("https://example.com/{}", i)),
            })
            .collect()
    }

    fn to_json(response: &JsonRpcResponse) -> Value {
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_protocol_and_identity() {
        let response = handler(MockRedditApi::new())
            .handle_message(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "mcp-reddit");
        assert_eq!(result["serverInfo"]["version"], "0.2.0");
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn tools_list_matches_dispatcher_names() {
        let response = handler(MockRedditApi::new())
            .handle_message(json!({"jsonrpc": "2.0", "id": "list", "method": "tools/list"}))
            .await;
        let result = response.result.unwrap();
        let listed: BTreeSet<String> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap().to_string())
            .collect();
        let dispatchable: BTreeSet<String> = crate::tools::ToolName::ALL
            .iter()
            .map(|tool| tool.as_str().to_string())
            .collect();
        assert_eq!(listed, dispatchable);
        assert_eq!(result["tools"].as_array().unwrap().len(), 8);
        assert!(result["tools"][0].get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn tools_call_wraps_result_as_pretty_text() {
        let mut mock = MockRedditApi::new();
        mock.expect_frontpage_posts()
            .withf(|limit| *limit == 5)
            .times(1)
            .returning(|limit| Ok(synthetic_posts(limit as usize)));

        let response = handler(mock)
            .handle_message(json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {"name": "get_frontpage_posts", "arguments": {"limit": 5}}
            }))
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\n  "), "expected 2-space indentation");

        let decoded: Vec<Post> = serde_json::from_str(text).unwrap();
        assert_eq!(decoded, synthetic_posts(5));
    }

    #[tokio::test]
    async fn missing_argument_is_internal_error() {
        let response = handler(MockRedditApi::new())
            .handle_message(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "get_subreddit_hot_posts", "arguments": {}}
            }))
            .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, INTERNAL_ERROR);
        assert!(error.message.contains("subreddit_name"));
        assert_eq!(response.id, json!(2));
    }

    #[tokio::test]
    async fn unknown_tool_is_internal_error() {
        let response = handler(MockRedditApi::new())
            .handle_message(json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "not_a_tool"}
            }))
            .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, INTERNAL_ERROR);
        assert_eq!(error.message, "Error processing mcp-server-reddit query: Unknown tool: not_a_tool");
    }

    #[tokio::test]
    async fn unsupported_method_is_method_not_found() {
        let response = handler(MockRedditApi::new())
            .handle_message(json!({"jsonrpc": "2.0", "id": 4, "method": "foo/bar"}))
            .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method not found: foo/bar");
        assert_eq!(response.id, json!(4));
    }

    #[tokio::test]
    async fn id_is_echoed_verbatim() {
        let handler = handler(MockRedditApi::new());
        for id in [json!(null), json!("abc"), json!(42), json!(1.5)] {
            let response = handler
                .handle_message(json!({"jsonrpc": "2.0", "id": id.clone(), "method": "initialize"}))
                .await;
            assert_eq!(response.id, id);
            assert_eq!(to_json(&response)["id"], id);
        }
    }

    #[tokio::test]
    async fn missing_id_serializes_as_null() {
        let response = handler(MockRedditApi::new())
            .handle_message(json!({"jsonrpc": "2.0", "method": "tools/list"}))
            .await;
        let value = to_json(&response);
        assert!(value.as_object().unwrap().contains_key("id"));
        assert_eq!(value["id"], Value::Null);
    }

    #[tokio::test]
    async fn invalid_envelopes_are_rejected_with_null_id() {
        let handler = handler(MockRedditApi::new());
        for message in [
            json!({"id": 9, "method": "initialize"}),
            json!({"jsonrpc": "1.0", "id": 9, "method": "initialize"}),
            json!({"jsonrpc": "2.0", "id": 9, "method": 12}),
            json!([1, 2, 3]),
        ] {
            let response = handler.handle_message(message).await;
            let error = response.error.as_ref().unwrap();
            assert_eq!(error.code, INTERNAL_ERROR);
            assert_eq!(error.message, "Invalid JSON-RPC request");
            assert_eq!(response.id, Value::Null);
            assert!(response.result.is_none());
        }
    }

    #[tokio::test]
    async fn unparseable_body_has_null_id() {
        let response = handler(MockRedditApi::new()).handle_body(b"{not json").await;
        let error = response.error.unwrap();
        assert_eq!(error.code, INTERNAL_ERROR);
        assert!(error.message.starts_with("Parse error"));
        assert_eq!(response.id, Value::Null);
    }

    #[tokio::test]
    async fn success_and_error_are_exclusive() {
        let handler = handler(MockRedditApi::new());
        let ok = to_json(&handler.handle_message(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await);
        assert!(ok.get("result").is_some() && ok.get("error").is_none());

        let err = to_json(&handler.handle_message(json!({"jsonrpc": "2.0", "id": 1, "method": "nope"})).await);
        assert!(err.get("error").is_some() && err.get("result").is_none());
        assert_eq!(err["jsonrpc"], "2.0");
    }
}
