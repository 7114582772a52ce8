use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a post title, enforced by the schema and the form.
pub const TITLE_MAX_LEN: usize = 128;

/// Post entity - a single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A post that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            created: Utc::now(),
        }
    }
}
