/// Core Server Framework Module
///
/// This module contains the protocol side of the server:
/// - config.rs: environment-driven configuration
/// - error.rs: JSON-RPC error taxonomy and codes
/// - rpc.rs: JSON-RPC 2.0 envelope handling and MCP method routing
/// - server.rs: HTTP and STDIO transports

pub mod config;
pub mod error;
pub mod rpc;
pub mod server;
