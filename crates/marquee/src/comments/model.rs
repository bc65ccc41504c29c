use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a comment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentOrigin {
    #[default]
    Local,
    Remote,
}

/// A comment as shown in a movie's feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub origin: CommentOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RemoteUser {
    pub id: u64,
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// Generic comment record of the remote service
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RemoteComment {
    pub id: u64,
    pub body: String,
    #[serde(rename = "postId")]
    pub post_id: u64,
    pub likes: u64,
    pub user: RemoteUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CommentBatch {
    pub comments: Vec<RemoteComment>,
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

/// A remote batch and the moment it was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFeed {
    pub comments: Vec<RemoteComment>,
    pub fetched_at: DateTime<Utc>,
}
