/// MCP Server Transports
///
/// This module binds the JSON-RPC envelope handler to the outside world:
/// - HTTP server with Actix Web (health, tool listing, JSON-RPC endpoint)
/// - STDIO server for line-delimited JSON-RPC (MCP Inspector, local clients)
///
/// Both transports share one `McpHandler`, which in turn holds the single
/// Reddit client handle for the lifetime of the process.

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    web, App, HttpServer, HttpResponse, Result,
    middleware::{Compress, Logger, DefaultHeaders},
};
use bytes::Bytes;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, error, info};

use super::config::Config;
use super::rpc::McpHandler;

/// Largest `/mcp` body accepted; actix's own default is 256 KiB.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Liveness payload for `GET /`.
async fn root() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "Reddit MCP Server"
    })))
}

/// Health check endpoint for load balancers and platform probes.
async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    })))
}

/// Tool catalog outside of JSON-RPC framing; mirrors `tools/list`.
async fn list_tools(handler: web::Data<McpHandler>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "tools": handler.catalog().tools()
    })))
}

/// JSON-RPC endpoint.
///
/// The body is taken as raw bytes rather than through `web::Json` so that
/// malformed input still gets a JSON-RPC error envelope instead of an HTTP
/// 400. Every outcome is returned with status 200, except bodies larger
/// than `MAX_BODY_BYTES`, which actix rejects with 413 before this runs.
async fn mcp(handler: web::Data<McpHandler>, body: Bytes) -> Result<HttpResponse> {
    let response = handler.handle_body(&body).await;
    Ok(HttpResponse::Ok().json(response))
}

/// Register the HTTP routes. No other paths are served.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/tools", web::get().to(list_tools))
        .route("/mcp", web::post().to(mcp));
}

/// Any origin, method and header; browser-based MCP clients call `/mcp`
/// directly.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Run the MCP server in HTTP mode.
///
/// Configured with:
/// - Worker threads: from config (CPU count, max 16)
/// - Keep-alive: 30 seconds
/// - Request timeout: 30 seconds
/// - Disconnect timeout: 2 seconds
/// - Shutdown timeout: 10 seconds
pub async fn run_server_http(config: &Config, handler: Arc<McpHandler>) -> std::io::Result<()> {
    let bind_addr = config.bind_addr();
    let handler = web::Data::from(handler);

    info!(
        server = %config.server_name,
        version = %config.server_version,
        bind = %bind_addr,
        workers = config.workers,
        "MCP server starting (HTTP mode)"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(handler.clone())
            // Compress JSON responses (gzip/brotli)
            .wrap(Compress::default())
            .wrap(cors())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
            )
            // %r = request line, %s = status, %Dms = duration in milliseconds
            .wrap(Logger::new("%r %s %Dms"))
            .configure(routes)
    })
    .workers(config.workers)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)?
    .run()
    .await
}

/// Run the MCP server in STDIO mode.
///
/// Reads one JSON-RPC message per line from stdin and writes one response
/// per line to stdout. Logging goes to stderr so the protocol stream stays
/// clean.
pub async fn run_server_stdio(handler: Arc<McpHandler>) -> std::io::Result<()> {
    info!("MCP server starting (STDIO mode)");

    // 8KB buffers balance memory usage with I/O efficiency
    let stdin = BufReader::with_capacity(8192, tokio::io::stdin());
    let stdout = BufWriter::with_capacity(8192, tokio::io::stdout());
    serve_lines(&handler, stdin, stdout).await
}

/// Line-delimited JSON-RPC loop over any reader/writer pair.
///
/// Requests are processed one at a time. Messages without an `id` member
/// are notifications and get no response. Lines that are not JSON are
/// answered with a parse error carrying a `null` id.
pub async fn serve_lines<R, W>(handler: &McpHandler, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(message) => {
                if message.get("id").is_none() && message.is_object() {
                    debug!(method = ?message.get("method"), "skipping notification");
                    continue;
                }
                handler.handle_message(message).await
            }
            Err(_) => handler.handle_body(line.as_bytes()).await,
        };

        let response_json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                continue;
            }
        };

        // Each response must be on a single line; flush so the client sees
        // it immediately.
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
