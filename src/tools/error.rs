use thiserror::Error;

use crate::reddit::RedditError;

/// Failure of a single `tools/call`.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required string parameter was absent, empty, or not a string.
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument {name}: expected {expected}")]
    InvalidArgument { name: &'static str, expected: &'static str },

    /// `params.arguments` was present but not a JSON object.
    #[error("Tool arguments must be a JSON object")]
    ArgumentsNotObject,

    #[error(transparent)]
    Reddit(#[from] RedditError),

    #[error("Failed to serialize tool result: {0}")]
    Serialize(#[from] serde_json::Error),
}
