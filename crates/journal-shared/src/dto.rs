//! Structured payloads for journal entities.
//!
//! Timestamps are ISO-8601 strings. A user payload never carries the
//! password column.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A post as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub created: String,
    /// Category names, sorted.
    pub categories: Vec<String>,
}

impl PostPayload {
    pub fn new(
        id: i32,
        title: String,
        text: String,
        created: DateTime<Utc>,
        categories: Vec<String>,
    ) -> Self {
        Self {
            id,
            title,
            text,
            created: iso8601(created),
            categories,
        }
    }
}

/// A user's public information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: i32,
    pub username: String,
}

/// A comment with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub id: i32,
    pub thoughts: String,
    pub author: UserPayload,
    pub written: String,
}

impl CommentPayload {
    pub fn new(id: i32, thoughts: String, author: UserPayload, written: DateTime<Utc>) -> Self {
        Self {
            id,
            thoughts,
            author,
            written: iso8601(written),
        }
    }
}

/// A category, as offered in the post form's choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub id: i32,
    pub name: String,
}
