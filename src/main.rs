/// Reddit MCP Server Entry Point
///
/// Reads configuration from the environment, builds the single shared
/// Reddit client, and starts the selected transport(s). See
/// `core::config` for the supported environment variables.

mod core;
mod reddit;
mod tools;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::{Config, TransportMode};
use crate::core::rpc::{McpHandler, ServerInfo};
use crate::core::server;
use crate::reddit::RedditClient;
use crate::tools::ToolDispatcher;

/// Initialize tracing with an env filter. Output goes to stderr so it never
/// mixes with the STDIO protocol stream.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_reddit=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let reddit = match RedditClient::new(config.reddit.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build Reddit client");
            std::process::exit(1);
        }
    };

    let handler = Arc::new(McpHandler::new(
        ServerInfo {
            name: config.server_name.clone(),
            version: config.server_version.clone(),
        },
        ToolDispatcher::new(Arc::new(reddit)),
    ));

    match config.transport {
        TransportMode::Stdio => server::run_server_stdio(handler).await,
        TransportMode::Http => server::run_server_http(&config, handler).await,
        TransportMode::Both => {
            // STDIO in the background, HTTP in the foreground
            let stdio_handler = handler.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = server::run_server_stdio(stdio_handler).await {
                    error!(error = %e, "STDIO server error");
                }
            });

            let http_result = server::run_server_http(&config, handler).await;

            // If HTTP server exits, abort STDIO task
            stdio_handle.abort();
            info!("HTTP server stopped");

            http_result
        }
    }
}
