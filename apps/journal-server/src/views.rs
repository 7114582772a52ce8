//! View models returned by the handlers, and the payload builders they use.

use serde::Serialize;

use journal_core::domain::{Category, Comment, Post, User};
use journal_core::forms::{CommentForm, FormErrors, PostForm, UserForm};
use journal_shared::{CategoryPayload, CommentPayload, PostPayload, UserPayload};

pub fn post_payload(post: Post, categories: &[Category]) -> PostPayload {
    let mut names: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    names.sort();
    PostPayload::new(post.id, post.title, post.text, post.created, names)
}

pub fn user_payload(user: &User) -> UserPayload {
    UserPayload {
        id: user.id,
        username: user.username.clone(),
    }
}

pub fn comment_payload(comment: Comment, author: &User) -> CommentPayload {
    CommentPayload::new(
        comment.id,
        comment.thoughts,
        user_payload(author),
        comment.written,
    )
}

fn choice_payloads(choices: &[(i32, String)]) -> Vec<CategoryPayload> {
    choices
        .iter()
        .map(|(id, name)| CategoryPayload {
            id: *id,
            name: name.clone(),
        })
        .collect()
}

/// `GET /`
#[derive(Debug, Serialize)]
pub struct ListView {
    pub posts: Vec<PostPayload>,
}

/// `GET /post/{id}`
#[derive(Debug, Serialize)]
pub struct DetailView {
    pub post: PostPayload,
    pub comments: Vec<CommentPayload>,
    /// Blank comment form, pointed at this post.
    pub form: CommentForm,
}

/// Create and edit post forms.
#[derive(Debug, Serialize)]
pub struct PostFormView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i32>,
    pub form: PostForm,
    pub choices: Vec<CategoryPayload>,
    pub errors: FormErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

impl PostFormView {
    pub fn new(form: PostForm, choices: &[(i32, String)], errors: FormErrors) -> Self {
        Self {
            post_id: None,
            form,
            choices: choice_payloads(choices),
            errors,
            csrf_token: None,
        }
    }

    pub fn for_post(mut self, id: i32) -> Self {
        self.post_id = Some(id);
        self
    }

    pub fn with_csrf(mut self, token: &str) -> Self {
        self.csrf_token = Some(token.to_string());
        self
    }
}

/// Login and register forms.
#[derive(Debug, Serialize)]
pub struct UserFormView {
    pub form: UserForm,
    pub errors: FormErrors,
    pub csrf_token: String,
}

impl UserFormView {
    pub fn new(form: UserForm, errors: FormErrors, csrf_token: &str) -> Self {
        Self {
            form,
            errors,
            csrf_token: csrf_token.to_string(),
        }
    }
}

/// `POST /comment/add` success.
#[derive(Debug, Serialize)]
pub struct CommentAdded {
    pub new_comment: CommentPayload,
}

/// `POST /comment/add` failure. `error` is always `"FAIL"`.
#[derive(Debug, Serialize)]
pub struct CommentFailed {
    pub form: CommentForm,
    pub error: &'static str,
    #[serde(skip_serializing_if = "FormErrors::is_empty")]
    pub errors: FormErrors,
}

impl CommentFailed {
    pub fn new(form: CommentForm, errors: FormErrors) -> Self {
        Self {
            form,
            error: "FAIL",
            errors,
        }
    }
}
