//! Submitted form data and the rules it must pass before reaching a repository.
//!
//! A failed validation yields [`FormErrors`] keyed by field name, which the
//! caller hands back to the client alongside the submitted values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{NewCategory, Post, TITLE_MAX_LEN, USERNAME_MAX_LEN};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_A_VALID_CHOICE: &str = "Not a valid choice.";
pub const TITLE_NOT_UNIQUE: &str = "Title must be unique!";
pub const USERNAME_TAKEN: &str = "Username already taken.";

/// Field name used for errors that belong to the form as a whole.
pub const FORM_ERROR_KEY: &str = "error";

const CATEGORY_MAX_LEN: usize = 255;

fn too_long(max: usize) -> String {
    format!("Field cannot be longer than {max} characters.")
}

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn with(mut self, field: &str, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn require<'a>(errors: &mut FormErrors, field: &str, value: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    }
    trimmed
}

fn max_len(errors: &mut FormErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, too_long(max));
    }
}

/// Create/edit post form.
///
/// `existing_category` is the id of a category picked from the choices list;
/// `categories` is a freeform name for a new category. Both are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub existing_category: String,
    pub categories: String,
}

/// A post form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidPost {
    pub title: String,
    pub text: String,
    pub existing_category: Option<i32>,
    pub new_category: Option<NewCategory>,
}

impl PostForm {
    /// Prefill the form from a stored post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            ..Self::default()
        }
    }

    /// Whether the submission asked for any category change.
    pub fn has_category_input(&self) -> bool {
        !self.existing_category.trim().is_empty() || !self.categories.trim().is_empty()
    }

    /// Validate against the current `(id, name)` category choices.
    pub fn validate(&self, choices: &[(i32, String)]) -> Result<ValidPost, FormErrors> {
        let mut errors = FormErrors::new();

        let title = require(&mut errors, "title", &self.title);
        max_len(&mut errors, "title", title, TITLE_MAX_LEN);
        require(&mut errors, "text", &self.text);

        let existing_category = match self.existing_category.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(id) if choices.iter().any(|(choice, _)| *choice == id) => Some(id),
                _ => {
                    errors.add("existing_category", NOT_A_VALID_CHOICE);
                    None
                }
            },
        };

        let new_category = match self.categories.trim() {
            "" => None,
            name => {
                max_len(&mut errors, "categories", name, CATEGORY_MAX_LEN);
                NewCategory::new(name).ok()
            }
        };

        errors.into_result(ValidPost {
            title: title.to_string(),
            text: self.text.clone(),
            existing_category,
            new_category,
        })
    }
}

/// Login and registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Credentials that passed validation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl UserForm {
    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::new();

        let username = require(&mut errors, "username", &self.username);
        max_len(&mut errors, "username", username, USERNAME_MAX_LEN);
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }

        errors.into_result(Credentials {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Comment form, posted from a post's detail page.
///
/// `path` is the page the comment was written on; its last segment is the
/// post id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub thoughts: String,
    pub path: String,
}

impl CommentForm {
    /// Returns the comment text.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        let thoughts = require(&mut errors, "thoughts", &self.thoughts);
        errors.into_result(thoughts.to_string())
    }

    /// The post id at the end of `path`, if there is one.
    pub fn post_id(&self) -> Option<i32> {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<(i32, String)> {
        vec![(1, "rust".to_string()), (2, "travel".to_string())]
    }

    #[test]
    fn test_post_form_requires_title_and_text() {
        let errors = PostForm::default().validate(&choices()).unwrap_err();

        assert_eq!(errors.get("title"), [REQUIRED]);
        assert_eq!(errors.get("text"), [REQUIRED]);
        assert!(errors.get("categories").is_empty());
    }

    #[test]
    fn test_post_form_rejects_whitespace_title() {
        let form = PostForm {
            title: "   ".to_string(),
            text: "body".to_string(),
            ..PostForm::default()
        };
        let errors = form.validate(&choices()).unwrap_err();
        assert_eq!(errors.get("title"), [REQUIRED]);
    }

    #[test]
    fn test_post_form_title_length() {
        let form = PostForm {
            title: "x".repeat(TITLE_MAX_LEN + 1),
            text: "body".to_string(),
            ..PostForm::default()
        };
        let errors = form.validate(&choices()).unwrap_err();
        assert_eq!(errors.get("title"), [too_long(TITLE_MAX_LEN)]);
    }

    #[test]
    fn test_post_form_category_selection() {
        let form = PostForm {
            title: " Hello ".to_string(),
            text: "World".to_string(),
            existing_category: "2".to_string(),
            categories: "  new one ".to_string(),
        };
        let valid = form.validate(&choices()).unwrap();

        assert_eq!(valid.title, "Hello");
        assert_eq!(valid.existing_category, Some(2));
        assert_eq!(valid.new_category.unwrap().name(), "new one");
    }

    #[test]
    fn test_post_form_unknown_choice() {
        let form = PostForm {
            title: "Hello".to_string(),
            text: "World".to_string(),
            existing_category: "99".to_string(),
            ..PostForm::default()
        };
        let errors = form.validate(&choices()).unwrap_err();
        assert_eq!(errors.get("existing_category"), [NOT_A_VALID_CHOICE]);
    }

    #[test]
    fn test_user_form() {
        let errors = UserForm::default().validate().unwrap_err();
        assert_eq!(errors.get("username"), [REQUIRED]);
        assert_eq!(errors.get("password"), [REQUIRED]);

        let valid = UserForm {
            username: "alice".to_string(),
            password: "secret123".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(valid.username, "alice");
        assert_eq!(valid.password, "secret123");
    }

    #[test]
    fn test_user_form_never_echoes_password() {
        let form = UserForm {
            username: "alice".to_string(),
            password: "secret123".to_string(),
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_comment_form() {
        assert_eq!(
            CommentForm::default().validate().unwrap_err().get("thoughts"),
            [REQUIRED]
        );

        let form = CommentForm {
            thoughts: "nice".to_string(),
            path: "http://localhost/post/42".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "nice");
        assert_eq!(form.post_id(), Some(42));
    }

    #[test]
    fn test_comment_path_without_id() {
        let form = CommentForm {
            thoughts: "nice".to_string(),
            path: "/post/abc".to_string(),
        };
        assert_eq!(form.post_id(), None);

        let trailing = CommentForm {
            path: "/post/7/".to_string(),
            ..form
        };
        assert_eq!(trailing.post_id(), Some(7));
    }

    #[test]
    fn test_form_errors_serialize_by_field() {
        let errors = FormErrors::new().with(FORM_ERROR_KEY, TITLE_NOT_UNIQUE);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "error": [TITLE_NOT_UNIQUE] }));
    }
}
