/// Reddit records returned by the facade.
///
/// These are the structured values that flow through the dispatcher. They
/// serialize to plain JSON objects with serde; nothing else about them is
/// interpreted by the MCP layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of content a post carries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Text,
    Link,
    Gallery,
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author: String,
    pub score: i64,
    pub subreddit: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: u64,
    pub post_type: PostType,
    /// Self text for text posts, the target URL otherwise.
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubredditInfo {
    pub name: String,
    pub subscriber_count: u64,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub score: i64,
    pub replies: Vec<Comment>,
}

/// A post together with its comment tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}
