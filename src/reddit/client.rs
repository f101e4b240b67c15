/// Reddit client over the public JSON endpoints.
///
/// Every listing page on reddit.com has a `.json` twin that can be read
/// without OAuth as long as a descriptive User-Agent is sent. This client
/// maps each facade operation onto one of those endpoints and converts the
/// `Thing`/`Listing` payloads into the records in `models.rs`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::RedditError;
use super::models::{Comment, Post, PostDetail, PostType, SubredditInfo};
use super::RedditApi;

/// Time windows accepted by the `top` listing. Empty means Reddit's default.
pub const TIME_FILTERS: [&str; 7] = ["", "hour", "day", "week", "month", "year", "all"];

pub const MAX_LIMIT: i64 = 100;
pub const MAX_COMMENT_DEPTH: i64 = 10;

/// Depth used when `post_comments` expands reply trees.
const COMMENTS_TREE_DEPTH: i64 = 3;

/// Connection settings for the Reddit client.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// Scheme and host, e.g. `https://www.reddit.com`
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            user_agent: format!("mcp-reddit/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Production `RedditApi` implementation.
///
/// Holds one pooled `reqwest::Client`; cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(config: RedditConfig) -> Result<Self, RedditError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base_url}{path}` and decode the body as JSON.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, RedditError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "requesting reddit");

        let response = self
            .http
            .get(&url)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RedditError::NotFound(url));
        }
        if !status.is_success() {
            return Err(RedditError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn subreddit_listing(&self, subreddit_name: &str, sort: &str, limit: i64) -> Result<Vec<Post>, RedditError> {
        let name = check_segment("subreddit_name", subreddit_name)?;
        check_range("limit", limit, 1, MAX_LIMIT)?;

        let body = self
            .get_json(&format!("/r/{}/{}.json", name, sort), &[("limit", limit.to_string())])
            .await?;
        parse_post_listing(&body)
    }
}

#[async_trait]
impl RedditApi for RedditClient {
    async fn frontpage_posts(&self, limit: i64) -> Result<Vec<Post>, RedditError> {
        check_range("limit", limit, 1, MAX_LIMIT)?;
        let body = self.get_json("/hot.json", &[("limit", limit.to_string())]).await?;
        parse_post_listing(&body)
    }

    async fn subreddit_info(&self, subreddit_name: &str) -> Result<SubredditInfo, RedditError> {
        let name = check_segment("subreddit_name", subreddit_name)?;
        let body = self.get_json(&format!("/r/{}/about.json", name), &[]).await?;
        parse_subreddit(&body).ok_or_else(|| RedditError::NotFound(format!("subreddit r/{}", name)))
    }

    async fn subreddit_hot_posts(&self, subreddit_name: &str, limit: i64) -> Result<Vec<Post>, RedditError> {
        self.subreddit_listing(subreddit_name, "hot", limit).await
    }

    async fn subreddit_new_posts(&self, subreddit_name: &str, limit: i64) -> Result<Vec<Post>, RedditError> {
        self.subreddit_listing(subreddit_name, "new", limit).await
    }

    async fn subreddit_top_posts(
        &self,
        subreddit_name: &str,
        limit: i64,
        time: &str,
    ) -> Result<Vec<Post>, RedditError> {
        let name = check_segment("subreddit_name", subreddit_name)?;
        check_range("limit", limit, 1, MAX_LIMIT)?;
        if !TIME_FILTERS.contains(&time) {
            return Err(RedditError::InvalidArgument {
                name: "time",
                reason: format!("'{}' is not one of hour, day, week, month, year, all", time),
            });
        }

        let mut query = vec![("limit", limit.to_string())];
        if !time.is_empty() {
            query.push(("t", time.to_string()));
        }
        let body = self.get_json(&format!("/r/{}/top.json", name), &query).await?;
        parse_post_listing(&body)
    }

    async fn subreddit_rising_posts(&self, subreddit_name: &str, limit: i64) -> Result<Vec<Post>, RedditError> {
        self.subreddit_listing(subreddit_name, "rising", limit).await
    }

    async fn post_content(
        &self,
        post_id: &str,
        comment_limit: i64,
        comment_depth: i64,
    ) -> Result<PostDetail, RedditError> {
        let id = check_segment("post_id", strip_fullname(post_id))?;
        check_range("comment_limit", comment_limit, 1, MAX_LIMIT)?;
        check_range("comment_depth", comment_depth, 1, MAX_COMMENT_DEPTH)?;

        let body = self
            .get_json(
                &format!("/comments/{}.json", id),
                &[("limit", comment_limit.to_string()), ("depth", comment_depth.to_string())],
            )
            .await?;
        parse_post_detail(&body, comment_limit, comment_depth)
    }

    async fn post_comments(&self, post_id: &str, limit: i64) -> Result<Vec<Comment>, RedditError> {
        let id = check_segment("post_id", strip_fullname(post_id))?;
        check_range("limit", limit, 1, MAX_LIMIT)?;

        let body = self
            .get_json(
                &format!("/comments/{}.json", id),
                &[("limit", limit.to_string()), ("depth", COMMENTS_TREE_DEPTH.to_string())],
            )
            .await?;
        let detail = parse_post_detail(&body, limit, COMMENTS_TREE_DEPTH)?;
        Ok(detail.comments)
    }
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), RedditError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RedditError::InvalidArgument {
            name,
            reason: format!("{} is outside [{}, {}]", value, min, max),
        })
    }
}

/// Subreddit names and post ids are interpolated into URL paths, so only
/// the characters Reddit itself allows in them are accepted.
fn check_segment<'a>(name: &'static str, value: &'a str) -> Result<&'a str, RedditError> {
    let value = value.trim();
    let valid = !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(RedditError::InvalidArgument {
            name,
            reason: format!("'{}' is not a valid identifier", value),
        })
    }
}

/// Accept `t3_abc123` as well as `abc123`.
fn strip_fullname(post_id: &str) -> &str {
    post_id.strip_prefix("t3_").unwrap_or(post_id)
}

// --- Reddit wire format ---

#[derive(Deserialize, Debug)]
struct Thing {
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize, Debug)]
struct Listing {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawPost {
    id: String,
    title: String,
    author: String,
    score: i64,
    subreddit: String,
    url: Option<String>,
    created_utc: f64,
    num_comments: u64,
    is_self: bool,
    is_gallery: bool,
    selftext: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawSubreddit {
    display_name: String,
    subscribers: Option<u64>,
    public_description: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct RawComment {
    id: String,
    author: String,
    body: String,
    score: i64,
    /// Either an empty string or a nested listing.
    replies: Value,
}

fn decode<T: for<'de> Deserialize<'de>>(value: &Value, what: &str) -> Result<T, RedditError> {
    T::deserialize(value).map_err(|e| RedditError::Decode(format!("{}: {}", what, e)))
}

fn listing_children(value: &Value) -> Result<Vec<Thing>, RedditError> {
    let thing: Thing = decode(value, "listing")?;
    if thing.kind != "Listing" {
        return Err(RedditError::Decode(format!("expected Listing, got {}", thing.kind)));
    }
    let listing: Listing = decode(&thing.data, "listing data")?;
    Ok(listing.children)
}

fn convert_post(raw: RawPost) -> Post {
    let url = raw.url.unwrap_or_default();
    let (post_type, content) = if raw.is_self {
        (PostType::Text, Some(raw.selftext))
    } else if raw.is_gallery {
        (PostType::Gallery, Some(url.clone()))
    } else if !url.is_empty() {
        (PostType::Link, Some(url.clone()))
    } else {
        (PostType::Unknown, None)
    };

    Post {
        id: raw.id,
        title: raw.title,
        author: raw.author,
        score: raw.score,
        subreddit: raw.subreddit,
        url,
        created_at: DateTime::<Utc>::from_timestamp(raw.created_utc as i64, 0).unwrap_or_default(),
        comment_count: raw.num_comments,
        post_type,
        content,
    }
}

pub(crate) fn parse_post_listing(body: &Value) -> Result<Vec<Post>, RedditError> {
    listing_children(body)?
        .into_iter()
        .filter(|child| child.kind == "t3")
        .map(|child| decode::<RawPost>(&child.data, "post").map(convert_post))
        .collect()
}

/// `None` when the payload is not a subreddit, which is what Reddit sends
/// back (a search listing) for names that do not exist.
pub(crate) fn parse_subreddit(body: &Value) -> Option<SubredditInfo> {
    let thing: Thing = decode(body, "subreddit").ok()?;
    if thing.kind != "t5" {
        return None;
    }
    let raw: RawSubreddit = decode(&thing.data, "subreddit data").ok()?;
    Some(SubredditInfo {
        name: raw.display_name,
        subscriber_count: raw.subscribers.unwrap_or(0),
        description: raw.public_description.filter(|d| !d.is_empty()),
    })
}

/// Build at most `limit` comments from a listing, following replies until
/// `depth` levels are included. `more` placeholders are skipped.
pub(crate) fn parse_comment_tree(listing: &Value, limit: usize, depth: i64) -> Result<Vec<Comment>, RedditError> {
    if depth < 1 {
        return Ok(Vec::new());
    }

    let mut comments = Vec::new();
    for child in listing_children(listing)? {
        if child.kind != "t1" {
            continue;
        }
        if comments.len() >= limit {
            break;
        }
        let raw: RawComment = decode(&child.data, "comment")?;
        let replies = if raw.replies.is_object() {
            parse_comment_tree(&raw.replies, usize::MAX, depth - 1)?
        } else {
            Vec::new()
        };
        comments.push(Comment {
            id: raw.id,
            author: raw.author,
            body: raw.body,
            score: raw.score,
            replies,
        });
    }
    Ok(comments)
}

/// `/comments/{id}.json` answers with `[post listing, comment listing]`.
pub(crate) fn parse_post_detail(body: &Value, comment_limit: i64, comment_depth: i64) -> Result<PostDetail, RedditError> {
    let parts = body
        .as_array()
        .filter(|parts| parts.len() == 2)
        .ok_or_else(|| RedditError::Decode("expected [post, comments] pair".to_string()))?;

    let post = parse_post_listing(&parts[0])?
        .into_iter()
        .next()
        .ok_or_else(|| RedditError::NotFound("post".to_string()))?;
    let limit = usize::try_from(comment_limit).unwrap_or(0);
    let comments = parse_comment_tree(&parts[1], limit, comment_depth)?;

    Ok(PostDetail { post, comments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn listing(children: Vec<Value>) -> Value {
        json!({ "kind": "Listing", "data": { "children": children } })
    }

    fn comment(id: &str, replies: Value) -> Value {
        json!({
            "kind": "t1",
            "data": { "id": id, "author": "someone", "body": format!("body {}", id), "score": 3, "replies": replies }
        })
    }

    #[test]
    fn parses_text_link_and_gallery_posts() {
        let body = listing(vec![
            json!({"kind": "t3", "data": {
                "id": "a1", "title": "Ask", "author": "u1", "score": 42, "subreddit": "rust",
                "url": "https://www.reddit.com/r/rust/comments/a1/ask/", "created_utc": 1700000000.0,
                "num_comments": 7, "is_self": true, "selftext": "hello"
            }}),
            json!({"kind": "t3", "data": {
                "id": "b2", "title": "Link", "author": "u2", "score": 1, "subreddit": "rust",
                "url": "https://example.com", "created_utc": 1700000000.0, "is_self": false
            }}),
            json!({"kind": "t3", "data": {
                "id": "c3", "title": "Pics", "author": "u3", "subreddit": "rust",
                "url": "https://www.reddit.com/gallery/c3", "is_gallery": true
            }}),
        ]);

        let posts = parse_post_listing(&body).unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].post_type, PostType::Text);
        assert_eq!(posts[0].content.as_deref(), Some("hello"));
        assert_eq!(posts[0].comment_count, 7);
        assert_eq!(posts[0].created_at.timestamp(), 1_700_000_000);
        assert_eq!(posts[1].post_type, PostType::Link);
        assert_eq!(posts[1].content.as_deref(), Some("https://example.com"));
        assert_eq!(posts[2].post_type, PostType::Gallery);
    }

    #[test]
    fn skips_non_post_children() {
        let body = listing(vec![json!({"kind": "more", "data": {}})]);
        assert!(parse_post_listing(&body).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_listing_payload() {
        let err = parse_post_listing(&json!({"kind": "t5", "data": {}})).unwrap_err();
        assert!(matches!(err, RedditError::Decode(_)));
    }

    #[test]
    fn parses_subreddit_about() {
        let body = json!({"kind": "t5", "data": {
            "display_name": "rust", "subscribers": 300000, "public_description": "A place for Rust"
        }});
        let info = parse_subreddit(&body).unwrap();
        assert_eq!(info.name, "rust");
        assert_eq!(info.subscriber_count, 300000);
        assert_eq!(info.description.as_deref(), Some("A place for Rust"));
    }

    #[test]
    fn unknown_subreddit_search_listing_is_none() {
        assert!(parse_subreddit(&listing(vec![])).is_none());
    }

    #[test]
    fn comment_tree_respects_depth_and_limit() {
        let nested = listing(vec![comment("c2", listing(vec![comment("c3", json!(""))]))]);
        let body = listing(vec![
            comment("c1", nested),
            json!({"kind": "more", "data": {"count": 12}}),
            comment("c4", json!("")),
            comment("c5", json!("")),
        ]);

        let tree = parse_comment_tree(&body, 2, 2).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, "c1");
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].id, "c2");
        assert!(tree[0].replies[0].replies.is_empty());
        assert_eq!(tree[1].id, "c4");
    }

    #[test]
    fn post_detail_requires_pair() {
        let err = parse_post_detail(&json!([listing(vec![])]), 10, 3).unwrap_err();
        assert!(matches!(err, RedditError::Decode(_)));
    }

    #[test]
    fn post_detail_combines_post_and_comments() {
        let post = listing(vec![json!({"kind": "t3", "data": {"id": "p1", "title": "T", "is_self": true}})]);
        let comments = listing(vec![comment("c1", json!(""))]);
        let detail = parse_post_detail(&json!([post, comments]), 10, 3).unwrap();
        assert_eq!(detail.post.id, "p1");
        assert_eq!(detail.comments.len(), 1);
    }

    #[test]
    fn identifiers_are_checked_before_use_in_paths() {
        assert_eq!(check_segment("subreddit_name", " rust ").unwrap(), "rust");
        assert!(check_segment("subreddit_name", "../admin").is_err());
        assert!(check_segment("post_id", "").is_err());
        assert_eq!(strip_fullname("t3_abc"), "abc");
    }

    #[tokio::test]
    async fn out_of_range_arguments_fail_without_a_request() {
        let client = RedditClient::new(RedditConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..RedditConfig::default()
        })
        .unwrap();

        let err = client.frontpage_posts(0).await.unwrap_err();
        assert!(matches!(err, RedditError::InvalidArgument { name: "limit", .. }));

        let err = client.post_content("abc", 10, 11).await.unwrap_err();
        assert!(matches!(err, RedditError::InvalidArgument { name: "comment_depth", .. }));

        let err = client.subreddit_top_posts("rust", 10, "decade").await.unwrap_err();
        assert!(matches!(err, RedditError::InvalidArgument { name: "time", .. }));
    }
}
