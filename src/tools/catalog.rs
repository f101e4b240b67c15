/// Tool Catalog
///
/// Static descriptors for every `ToolName`. The catalog is pure data: it is
/// built once at startup, serialized for `tools/list` and `GET /tools`, and
/// supplies the default values the dispatcher substitutes for absent
/// arguments.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::ToolName;
use crate::reddit::client::{MAX_COMMENT_DEPTH, MAX_LIMIT, TIME_FILTERS};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_COMMENT_LIMIT: i64 = 10;
pub const DEFAULT_COMMENT_DEPTH: i64 = 3;
pub const DEFAULT_TIME: &str = "";

const SUBREDDIT_NAME_DESCRIPTION: &str = "Name of the subreddit (e.g. 'Python', 'news')";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Object,
}

/// JSON-Schema-style description of one parameter, or of the whole
/// argument object when `kind` is `Object`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaNode {
    fn new(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            default: None,
            minimum: None,
            maximum: None,
            allowed: None,
            properties: None,
            required: Vec::new(),
        }
    }

    /// Top-level argument object with no properties yet.
    pub fn object() -> Self {
        Self {
            properties: Some(BTreeMap::new()),
            ..Self::new(SchemaType::Object)
        }
    }

    pub fn string(description: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            ..Self::new(SchemaType::String)
        }
    }

    pub fn integer(description: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            ..Self::new(SchemaType::Integer)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn bounded(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn property(mut self, name: &str, node: SchemaNode) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), node);
        self
    }

    pub fn required_property(mut self, name: &str, node: SchemaNode) -> Self {
        self.required.push(name.to_string());
        self.property(name, node)
    }
}

/// MCP tool definition as advertised to clients.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: SchemaNode,
}

fn limit_schema(description: &str) -> SchemaNode {
    SchemaNode::integer(description)
        .with_default(DEFAULT_LIMIT)
        .bounded(1, MAX_LIMIT)
}

fn posts_limit() -> SchemaNode {
    limit_schema("Number of posts to return (default: 10)")
}

fn subreddit_name() -> SchemaNode {
    SchemaNode::string(SUBREDDIT_NAME_DESCRIPTION)
}

fn post_id() -> SchemaNode {
    SchemaNode::string("ID of the post")
}

impl ToolName {
    /// Descriptor advertised for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        let (description, input_schema) = match self {
            ToolName::GetFrontpagePosts => (
                "Get hot posts from Reddit frontpage",
                SchemaNode::object().property("limit", posts_limit()),
            ),
            ToolName::GetSubredditInfo => (
                "Get information about a subreddit",
                SchemaNode::object().required_property("subreddit_name", subreddit_name()),
            ),
            ToolName::GetSubredditHotPosts => (
                "Get hot posts from a specific subreddit",
                SchemaNode::object()
                    .required_property("subreddit_name", subreddit_name())
                    .property("limit", posts_limit()),
            ),
            ToolName::GetSubredditNewPosts => (
                "Get new posts from a specific subreddit",
                SchemaNode::object()
                    .required_property("subreddit_name", subreddit_name())
                    .property("limit", posts_limit()),
            ),
            ToolName::GetSubredditTopPosts => (
                "Get top posts from a specific subreddit",
                SchemaNode::object()
                    .required_property("subreddit_name", subreddit_name())
                    .property("limit", posts_limit())
                    .property(
                        "time",
                        SchemaNode::string(
                            "Time filter for top posts (e.g. 'hour', 'day', 'week', 'month', 'year', 'all')",
                        )
                        .with_default(DEFAULT_TIME)
                        .one_of(&TIME_FILTERS),
                    ),
            ),
            ToolName::GetSubredditRisingPosts => (
                "Get rising posts from a specific subreddit",
                SchemaNode::object()
                    .required_property("subreddit_name", subreddit_name())
                    .property("limit", posts_limit()),
            ),
            ToolName::GetPostContent => (
                "Get detailed content of a specific post",
                SchemaNode::object()
                    .required_property("post_id", post_id())
                    .property(
                        "comment_limit",
                        SchemaNode::integer("Number of top-level comments to return (default: 10)")
                            .with_default(DEFAULT_COMMENT_LIMIT)
                            .bounded(1, MAX_LIMIT),
                    )
                    .property(
                        "comment_depth",
                        SchemaNode::integer("Maximum depth of comment tree (default: 3)")
                            .with_default(DEFAULT_COMMENT_DEPTH)
                            .bounded(1, MAX_COMMENT_DEPTH),
                    ),
            ),
            ToolName::GetPostComments => (
                "Get comments from a post",
                SchemaNode::object()
                    .required_property("post_id", post_id())
                    .property("limit", limit_schema("Number of comments to return (default: 10)")),
            ),
        };

        ToolDescriptor {
            name: self.as_str(),
            description,
            input_schema,
        }
    }
}

/// The full, immutable list of tool descriptors.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: ToolName::ALL.into_iter().map(ToolName::descriptor).collect(),
        }
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    #[allow(dead_code)] // lookup by name; tools/list serves the full set
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}
