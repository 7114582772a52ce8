use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Category entity - a tag shared by any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// A category that has not been stored yet.
///
/// There is no default constructor: a category always has a name.
#[derive(Debug, Clone)]
pub struct NewCategory {
    name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_name(self) -> String {
        self.name
    }
}
