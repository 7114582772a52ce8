use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity. Owned by both its author and the post it was left on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub thoughts: String,
    pub written: DateTime<Utc>,
    pub author_id: i32,
    pub post_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub thoughts: String,
    pub written: DateTime<Utc>,
    pub author_id: i32,
    pub post_id: i32,
}

impl NewComment {
    pub fn new(thoughts: impl Into<String>, author_id: i32, post_id: i32) -> Self {
        Self {
            thoughts: thoughts.into(),
            written: Utc::now(),
            author_id,
            post_id,
        }
    }
}
