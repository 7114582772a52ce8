//! Comment handler.

use actix_web::{HttpResponse, web};

use journal_core::error::DomainError;
use journal_core::forms::{CommentForm, FormErrors};
use journal_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
use journal_core::services;

use crate::middleware::auth::Authorized;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, CommentAdded, CommentFailed};

/// POST /comment/add
///
/// The post is the last segment of the form's `path`. Failures answer with
/// the submitted form and `"error": "FAIL"`.
pub async fn add(
    state: web::Data<AppState>,
    auth: Authorized,
    body: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let identity = auth.require_identity()?;
    let form = body.into_inner();

    let thoughts = match form.validate() {
        Ok(thoughts) => thoughts,
        Err(errors) => {
            return Ok(HttpResponse::UnprocessableEntity().json(CommentFailed::new(form, errors)));
        }
    };
    let Some(post_id) = form.post_id() else {
        tracing::info!(path = %form.path, "Comment path does not name a post");
        return Ok(HttpResponse::NotFound().json(CommentFailed::new(form, FormErrors::new())));
    };

    let uow = match state.begin().await {
        Ok(uow) => uow,
        Err(e) => return Ok(store_failed(form, e)),
    };
    let posts = uow.posts();
    let users = uow.users();
    let comments = uow.comments();

    let users: &dyn UserRepository = &users;
    let author = match users.find_by_id(identity.user_id).await {
        Ok(Some(author)) => author,
        Ok(None) => {
            tracing::warn!(user_id = identity.user_id, "Identity token names an unknown user");
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Ok(store_failed(form, e)),
    };

    let posts: &dyn PostRepository = &posts;
    let comments: &dyn CommentRepository = &comments;
    let added = services::comments::add(posts, comments, &author, post_id, thoughts).await;

    match added {
        Ok(comment) => {
            if let Err(e) = uow.commit().await {
                return Ok(store_failed(form, e));
            }
            tracing::info!(comment_id = comment.id, post_id, "Comment added");
            Ok(HttpResponse::Ok().json(CommentAdded {
                new_comment: views::comment_payload(comment, &author),
            }))
        }
        Err(DomainError::NotFound { .. }) => {
            if let Err(e) = uow.rollback().await {
                tracing::warn!("Rollback after missing post failed: {}", e);
            }
            Ok(HttpResponse::NotFound().json(CommentFailed::new(form, FormErrors::new())))
        }
        Err(e) => Ok(store_failed(form, e)),
    }
}

/// 500 with the submitted form. The cause is logged, never sent.
fn store_failed(form: CommentForm, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("Failed to store comment: {}", err);
    HttpResponse::InternalServerError().json(CommentFailed::new(form, FormErrors::new()))
}
