/// Errors surfaced at the JSON-RPC boundary.
///
/// Every variant becomes a JSON-RPC error object; none of them is fatal to
/// the server.
use thiserror::Error;

use crate::tools::ToolError;

/// JSON-RPC "method not found".
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC "internal error", used for every other failure.
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Error, Debug)]
pub enum RpcError {
    /// The message is JSON but not a JSON-RPC 2.0 request.
    #[error("Invalid JSON-RPC request")]
    InvalidEnvelope,

    /// The body could not be parsed as JSON at all.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Error processing mcp-server-reddit query: {0}")]
    Tool(#[from] ToolError),
}

impl RpcError {
    pub fn code(&self) -> i32 {
        match self {
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidEnvelope | RpcError::Parse(_) | RpcError::Tool(_) => INTERNAL_ERROR,
        }
    }
}
