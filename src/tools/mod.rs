/// Tools Module
///
/// This module contains the MCP tool layer:
/// - catalog.rs: tool descriptors and their input schemas
/// - dispatch.rs: argument validation and invocation of the Reddit facade
/// - error.rs: tool-level error type
///
/// Both the catalog and the dispatcher are driven by the closed `ToolName`
/// enumeration, so adding a variant without a descriptor or a handler is a
/// compile error rather than a silent gap.

pub mod catalog;
pub mod dispatch;
pub mod error;

use std::fmt;
use std::str::FromStr;

pub use dispatch::ToolDispatcher;
pub use error::ToolError;

/// Every operation the server exposes as an MCP tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetFrontpagePosts,
    GetSubredditInfo,
    GetSubredditHotPosts,
    GetSubredditNewPosts,
    GetSubredditTopPosts,
    GetSubredditRisingPosts,
    GetPostContent,
    GetPostComments,
}

impl ToolName {
    /// All tools, in the order they are advertised.
    pub const ALL: [ToolName; 8] = [
        ToolName::GetFrontpagePosts,
        ToolName::GetSubredditInfo,
        ToolName::GetSubredditHotPosts,
        ToolName::GetSubredditNewPosts,
        ToolName::GetSubredditTopPosts,
        ToolName::GetSubredditRisingPosts,
        ToolName::GetPostContent,
        ToolName::GetPostComments,
    ];

    /// Wire name used in `tools/list` and `tools/call`.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetFrontpagePosts => "get_frontpage_posts",
            ToolName::GetSubredditInfo => "get_subreddit_info",
            ToolName::GetSubredditHotPosts => "get_subreddit_hot_posts",
            ToolName::GetSubredditNewPosts => "get_subreddit_new_posts",
            ToolName::GetSubredditTopPosts => "get_subreddit_top_posts",
            ToolName::GetSubredditRisingPosts => "get_subreddit_rising_posts",
            ToolName::GetPostContent => "get_post_content",
            ToolName::GetPostComments => "get_post_comments",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), tool);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "not_a_tool".parse::<ToolName>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: not_a_tool");
    }
}
