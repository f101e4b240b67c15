/// Server Configuration
///
/// All settings come from environment variables and are read once at
/// startup. Lookups go through a closure so tests can supply their own
/// variables without touching the process environment.
///
/// Environment Variables:
/// - MCP_TRANSPORT_MODE: "http", "stdio", or "both" (default: "http")
/// - HOST: Bind address for HTTP mode (default: "0.0.0.0")
/// - PORT: Port number for HTTP mode (default: 8000)
/// - SERVER_NAME / SERVER_VERSION: identity reported by `initialize`
/// - WORKER_THREADS: actix worker count (default: CPU count, max 16)
/// - REDDIT_BASE_URL, REDDIT_USER_AGENT, REDDIT_TIMEOUT_SECS: Reddit client

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::reddit::client::RedditConfig;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_NAME: &str = "mcp-reddit";
const MAX_WORKERS: usize = 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid transport mode '{0}'. Must be 'stdio', 'http', or 'both'")]
    InvalidTransport(String),
}

/// Which transports to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Line-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP with actix-web
    Http,
    /// Both at once; STDIO runs in a background task
    Both,
}

impl FromStr for TransportMode {
    type Err = ConfigError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "both" => Ok(TransportMode::Both),
            _ => Err(ConfigError::InvalidTransport(mode.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    pub transport: TransportMode,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub reddit: RedditConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = match lookup("MCP_TRANSPORT_MODE") {
            Some(mode) => mode.parse()?,
            None => TransportMode::Http,
        };

        let workers = parse_or("WORKER_THREADS", lookup("WORKER_THREADS"), num_cpus::get())
            .clamp(1, MAX_WORKERS);

        let reddit_defaults = RedditConfig::default();
        let timeout_secs = parse_or(
            "REDDIT_TIMEOUT_SECS",
            lookup("REDDIT_TIMEOUT_SECS"),
            reddit_defaults.timeout.as_secs(),
        );
        let reddit = RedditConfig {
            base_url: lookup("REDDIT_BASE_URL").unwrap_or(reddit_defaults.base_url),
            user_agent: lookup("REDDIT_USER_AGENT").unwrap_or(reddit_defaults.user_agent),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            server_name: lookup("SERVER_NAME").unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            server_version: lookup("SERVER_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            transport,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT),
            workers,
            reddit,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an optional variable, falling back to `default` (with a warning)
/// when it is set but malformed.
fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring malformed environment variable");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(config.server_name, "mcp-reddit");
        assert_eq!(config.server_version, env!("CARGO_PKG_VERSION"));
        assert!((1..=16).contains(&config.workers));
        assert_eq!(config.reddit.base_url, "https://www.reddit.com");
        assert_eq!(config.reddit.timeout, Duration::from_secs(30));
    }

    #[test]
    fn port_and_transport_from_env() {
        let config = config_from(&[("PORT", "9001"), ("MCP_TRANSPORT_MODE", "Both")]).unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.transport, TransportMode::Both);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("WORKER_THREADS", "500")]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.workers, 16);
    }

    #[test]
    fn unknown_transport_is_an_error() {
        let err = config_from(&[("MCP_TRANSPORT_MODE", "carrier-pigeon")]).unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn reddit_settings() {
        let config = config_from(&[
            ("REDDIT_BASE_URL", "http://localhost:1234"),
            ("REDDIT_USER_AGENT", "test-agent"),
            ("REDDIT_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.reddit.base_url, "http://localhost:1234");
        assert_eq!(config.reddit.user_agent, "test-agent");
        assert_eq!(config.reddit.timeout, Duration::from_secs(5));
    }
}
