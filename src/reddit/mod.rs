/// Reddit Client Facade
///
/// This module contains everything that talks to Reddit:
/// - error.rs: facade error type
/// - models.rs: post, comment and subreddit records
/// - client.rs: reqwest implementation over Reddit's public JSON endpoints
///
/// The MCP layer only depends on the `RedditApi` trait, so tests can swap in
/// a mock and the server holds a single `Arc<dyn RedditApi>` for its lifetime.

pub mod client;
pub mod error;
pub mod models;

use async_trait::async_trait;

pub use client::RedditClient;
pub use error::RedditError;
pub use models::{Comment, Post, PostDetail, SubredditInfo};

#[cfg(test)]
use mockall::automock;

/// Read-only Reddit operations consumed by the tool dispatcher.
///
/// Limits and depths are passed through exactly as the MCP client sent them;
/// implementations are responsible for rejecting out-of-range values.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// Hot posts from the Reddit frontpage.
    async fn frontpage_posts(&self, limit: i64) -> Result<Vec<Post>, RedditError>;

    async fn subreddit_info(&self, subreddit_name: &str) -> Result<SubredditInfo, RedditError>;

    async fn subreddit_hot_posts(&self, subreddit_name: &str, limit: i64) -> Result<Vec<Post>, RedditError>;

    async fn subreddit_new_posts(&self, subreddit_name: &str, limit: i64) -> Result<Vec<Post>, RedditError>;

    /// Top posts; an empty `time` means Reddit's default window.
    async fn subreddit_top_posts(
        &self,
        subreddit_name: &str,
        limit: i64,
        time: &str,
    ) -> Result<Vec<Post>, RedditError>;

    async fn subreddit_rising_posts(&self, subreddit_name: &str, limit: i64) -> Result<Vec<Post>, RedditError>;

    /// A post with up to `comment_limit` top-level comments, each expanded
    /// to at most `comment_depth` levels.
    async fn post_content(
        &self,
        post_id: &str,
        comment_limit: i64,
        comment_depth: i64,
    ) -> Result<PostDetail, RedditError>;

    async fn post_comments(&self, post_id: &str, limit: i64) -> Result<Vec<Comment>, RedditError>;
}
