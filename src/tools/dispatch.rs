/// Tool Dispatcher
///
/// Maps a `tools/call` invocation onto the Reddit facade: required string
/// arguments are checked, optional ones fall back to the catalog defaults,
/// and the facade's typed result is normalized to a plain JSON value.
///
/// Range and enum checks are left to the facade; values are forwarded as
/// the client sent them.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::catalog::{DEFAULT_COMMENT_DEPTH, DEFAULT_COMMENT_LIMIT, DEFAULT_LIMIT, DEFAULT_TIME};
use super::error::ToolError;
use super::ToolName;
use crate::reddit::RedditApi;

/// Decoded `tools/call` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    /// Build from `tools/call` params. A missing `arguments` (or `null`)
    /// becomes an empty map; a missing `name` becomes the empty string and
    /// is later reported as an unknown tool.
    pub fn from_params(params: &Value) -> Result<Self, ToolError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(arguments)) => arguments.clone(),
            Some(_) => return Err(ToolError::ArgumentsNotObject),
        };

        Ok(Self { name, arguments })
    }
}

/// Executes tool calls against a shared, read-only Reddit facade.
#[derive(Clone)]
pub struct ToolDispatcher {
    reddit: Arc<dyn RedditApi>,
}

impl ToolDispatcher {
    pub fn new(reddit: Arc<dyn RedditApi>) -> Self {
        Self { reddit }
    }

    /// Run one tool and return its result as plain JSON.
    pub async fn invoke(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let tool: ToolName = name.parse()?;
        debug!(tool = %tool, ?arguments, "invoking tool");

        let result = self.run(tool, arguments).await;
        if let Err(e) = &result {
            warn!(tool = %tool, error = %e, "tool call failed");
        }
        result
    }

    async fn run(&self, tool: ToolName, args: &Map<String, Value>) -> Result<Value, ToolError> {
        let reddit = self.reddit.as_ref();

        match tool {
            ToolName::GetFrontpagePosts => {
                let limit = optional_int(args, "limit", DEFAULT_LIMIT)?;
                to_plain(reddit.frontpage_posts(limit).await?)
            }
            ToolName::GetSubredditInfo => {
                let name = required_str(args, "subreddit_name")?;
                to_plain(reddit.subreddit_info(name).await?)
            }
            ToolName::GetSubredditHotPosts => {
                let name = required_str(args, "subreddit_name")?;
                let limit = optional_int(args, "limit", DEFAULT_LIMIT)?;
                to_plain(reddit.subreddit_hot_posts(name, limit).await?)
            }
            ToolName::GetSubredditNewPosts => {
                let name = required_str(args, "subreddit_name")?;
                let limit = optional_int(args, "limit", DEFAULT_LIMIT)?;
                to_plain(reddit.subreddit_new_posts(name, limit).await?)
            }
            ToolName::GetSubredditTopPosts => {
                let name = required_str(args, "subreddit_name")?;
                let limit = optional_int(args, "limit", DEFAULT_LIMIT)?;
                let time = optional_str(args, "time", DEFAULT_TIME)?;
                to_plain(reddit.subreddit_top_posts(name, limit, time).await?)
            }
            ToolName::GetSubredditRisingPosts => {
                let name = required_str(args, "subreddit_name")?;
                let limit = optional_int(args, "limit", DEFAULT_LIMIT)?;
                to_plain(reddit.subreddit_rising_posts(name, limit).await?)
            }
            ToolName::GetPostContent => {
                let post_id = required_str(args, "post_id")?;
                let comment_limit = optional_int(args, "comment_limit", DEFAULT_COMMENT_LIMIT)?;
                let comment_depth = optional_int(args, "comment_depth", DEFAULT_COMMENT_DEPTH)?;
                to_plain(reddit.post_content(post_id, comment_limit, comment_depth).await?)
            }
            ToolName::GetPostComments => {
                let post_id = required_str(args, "post_id")?;
                let limit = optional_int(args, "limit", DEFAULT_LIMIT)?;
                to_plain(reddit.post_comments(post_id, limit).await?)
            }
        }
    }
}

/// Convert a facade result into plain JSON.
///
/// Records become objects, sequences become arrays element-wise, and values
/// that are already plain JSON are returned unchanged.
pub fn to_plain<T: Serialize>(value: T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(value)?)
}

fn required_str<'a>(args: &'a Map<String, Value>, name: &'static str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(ToolError::MissingArgument(name))
}

fn optional_int(args: &Map<String, Value>, name: &'static str, default: i64) -> Result<i64, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_i64().ok_or(ToolError::InvalidArgument {
            name,
            expected: "an integer",
        }),
    }
}

fn optional_str<'a>(
    args: &'a Map<String, Value>,
    name: &'static str,
    default: &'static str,
) -> Result<&'a str, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_str().ok_or(ToolError::InvalidArgument {
            name,
            expected: "a string",
        }),
    }
}
