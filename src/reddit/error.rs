/// Errors raised by the Reddit client facade.
///
/// The dispatcher never interprets these; their messages are relayed to the
/// MCP client as-is.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedditError {
    /// An argument was outside the range Reddit accepts.
    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Reddit returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected listing shape.
    #[error("Unexpected Reddit response: {0}")]
    Decode(String),
}
