//! Post handlers: list, detail, create and edit.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use journal_core::error::DomainError;
use journal_core::forms::{CommentForm, FORM_ERROR_KEY, FormErrors, PostForm, TITLE_NOT_UNIQUE};
use journal_core::ports::{CommentRepository, PostRepository};
use journal_core::services;

use super::{detail_path, redirect};
use crate::middleware::auth::Authorized;
use crate::middleware::csrf::{CsrfProtectedForm, CsrfToken};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, DetailView, ListView, PostFormView};

fn post_not_found(id: i32) -> AppError {
    AppError::from(DomainError::NotFound {
        entity_type: "Post",
        id,
    })
}

/// GET /
pub async fn list(state: web::Data<AppState>, _auth: Authorized) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let repo = uow.posts();

    let posts = services::posts::all(&repo).await?;
    let ids: Vec<i32> = posts.iter().map(|post| post.id).collect();
    let mut categories = repo.categories_for(&ids).await?;
    uow.commit().await?;

    let posts = posts
        .into_iter()
        .map(|post| {
            let linked = categories.remove(&post.id).unwrap_or_default();
            views::post_payload(post, &linked)
        })
        .collect();

    Ok(HttpResponse::Ok().json(ListView { posts }))
}

/// GET /post/{id}
pub async fn detail(
    state: web::Data<AppState>,
    _auth: Authorized,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let uow = state.begin().await?;
    let repo = uow.posts();

    let post = services::posts::by_id(&repo, id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    let categories = repo.categories(id).await?;
    let thread = uow.comments().thread(id).await?;
    uow.commit().await?;

    let view = DetailView {
        post: views::post_payload(post, &categories),
        comments: thread
            .into_iter()
            .map(|(comment, author)| views::comment_payload(comment, &author))
            .collect(),
        form: CommentForm {
            path: detail_path(id),
            ..CommentForm::default()
        },
    };

    Ok(HttpResponse::Ok().json(view))
}

/// GET /post/new
pub async fn create_form(
    state: web::Data<AppState>,
    _auth: Authorized,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let choices = services::posts::get_choices(&uow.categories()).await?;
    uow.commit().await?;

    let view = PostFormView::new(PostForm::default(), &choices, FormErrors::new())
        .with_csrf(csrf.value());
    Ok(csrf.respond(StatusCode::OK, state.cookie_secure).json(view))
}

/// POST /post/new
///
/// The post and its category links are written in one transaction.
pub async fn create(
    state: web::Data<AppState>,
    _auth: Authorized,
    csrf: CsrfToken,
    body: web::Form<CsrfProtectedForm<PostForm>>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner().verify(&csrf)?;

    let uow = state.begin().await?;
    // Choices are read before any write: a failed insert aborts the
    // transaction on Postgres.
    let choices = services::posts::get_choices(&uow.categories()).await?;

    let rerender = |form: PostForm, errors: FormErrors| {
        let view = PostFormView::new(form, &choices, errors).with_csrf(csrf.value());
        csrf.respond(StatusCode::UNPROCESSABLE_ENTITY, state.cookie_secure)
            .json(view)
    };

    let valid = match form.validate(&choices) {
        Ok(valid) => valid,
        Err(errors) => {
            uow.rollback().await?;
            return Ok(rerender(form, errors));
        }
    };

    let created = {
        let posts = uow.posts();
        let categories = uow.categories();
        services::posts::create(&posts, &categories, valid).await
    };

    match created {
        Ok(post) => {
            uow.commit().await?;
            tracing::info!(post_id = post.id, "Post created");
            Ok(redirect(&detail_path(post.id)))
        }
        Err(DomainError::Duplicate("title")) => {
            uow.rollback().await?;
            Ok(rerender(
                form,
                FormErrors::new().with(FORM_ERROR_KEY, TITLE_NOT_UNIQUE),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /post/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    _auth: Authorized,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let uow = state.begin().await?;

    let post = services::posts::by_id(&uow.posts(), id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    let choices = services::posts::get_choices(&uow.categories()).await?;
    uow.commit().await?;

    let view = PostFormView::new(PostForm::from_post(&post), &choices, FormErrors::new())
        .for_post(id);
    Ok(HttpResponse::Ok().json(view))
}

/// POST /post/{id}/edit
///
/// Only title and text are saved; category fields are ignored.
pub async fn edit(
    state: web::Data<AppState>,
    _auth: Authorized,
    path: web::Path<i32>,
    body: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = body.into_inner();
    let uow = state.begin().await?;

    if services::posts::by_id(&uow.posts(), id).await?.is_none() {
        return Err(post_not_found(id));
    }
    let choices = services::posts::get_choices(&uow.categories()).await?;

    let rerender = |form: PostForm, errors: FormErrors| {
        HttpResponse::UnprocessableEntity()
            .json(PostFormView::new(form, &choices, errors).for_post(id))
    };

    let valid = match form.validate(&choices) {
        Ok(valid) => valid,
        Err(errors) => {
            uow.rollback().await?;
            return Ok(rerender(form, errors));
        }
    };

    if form.has_category_input() {
        tracing::warn!(post_id = id, "Category changes on edit are not applied");
    }

    let modified = services::posts::modify(&uow.posts(), &valid, id).await;
    match modified {
        Ok(post) => {
            uow.commit().await?;
            tracing::info!(post_id = post.id, "Post updated");
            Ok(redirect(&detail_path(post.id)))
        }
        Err(DomainError::Duplicate("title")) => {
            uow.rollback().await?;
            Ok(rerender(
                form,
                FormErrors::new().with(FORM_ERROR_KEY, TITLE_NOT_UNIQUE),
            ))
        }
        Err(e) => Err(e.into()),
    }
}
