//! Login, logout and registration handlers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use journal_core::domain::User;
use journal_core::error::DomainError;
use journal_core::forms::{FORM_ERROR_KEY, FormErrors, USERNAME_TAKEN, UserForm};
use journal_core::services;

use super::found;
use crate::middleware::auth::{forget, remember};
use crate::middleware::csrf::{CsrfProtectedForm, CsrfToken};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::UserFormView;

const LOGIN_FAILED: &str = "Unable to validate login. Try again.";

/// Redirect home with a fresh identity cookie for `user`.
fn sign_in(state: &AppState, user: &User) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;
    let cookie = remember(token, state.tokens.expiration_seconds(), state.cookie_secure);
    Ok(found("/").cookie(cookie).finish())
}

/// GET /login
pub async fn login_form(state: web::Data<AppState>, csrf: CsrfToken) -> HttpResponse {
    let view = UserFormView::new(UserForm::default(), FormErrors::new(), csrf.value());
    csrf.respond(StatusCode::OK, state.cookie_secure).json(view)
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    csrf: CsrfToken,
    body: web::Form<CsrfProtectedForm<UserForm>>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner().verify(&csrf)?;

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            let view = UserFormView::new(form, errors, csrf.value());
            return Ok(csrf
                .respond(StatusCode::UNPROCESSABLE_ENTITY, state.cookie_secure)
                .json(view));
        }
    };

    let uow = state.begin().await?;
    let authenticated = {
        let users = uow.users();
        services::accounts::authenticate(&users, state.passwords.as_ref(), &credentials).await?
    };

    match authenticated {
        Some(user) => {
            uow.commit().await?;
            tracing::info!(user_id = user.id, "User logged in");
            sign_in(&state, &user)
        }
        None => {
            uow.rollback().await?;
            tracing::info!(username = %credentials.username, "Login failed");
            let view = UserFormView::new(
                form,
                FormErrors::new().with(FORM_ERROR_KEY, LOGIN_FAILED),
                csrf.value(),
            );
            Ok(csrf
                .respond(StatusCode::UNAUTHORIZED, state.cookie_secure)
                .cookie(forget())
                .json(view))
        }
    }
}

/// GET /logout
pub async fn logout() -> HttpResponse {
    found("/").cookie(forget()).finish()
}

/// GET /register
pub async fn register_form(state: web::Data<AppState>, csrf: CsrfToken) -> HttpResponse {
    let view = UserFormView::new(UserForm::default(), FormErrors::new(), csrf.value());
    csrf.respond(StatusCode::OK, state.cookie_secure).json(view)
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    csrf: CsrfToken,
    body: web::Form<CsrfProtectedForm<UserForm>>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner().verify(&csrf)?;

    let rerender = |form: UserForm, errors: FormErrors| {
        let view = UserFormView::new(form, errors, csrf.value());
        csrf.respond(StatusCode::UNPROCESSABLE_ENTITY, state.cookie_secure)
            .json(view)
    };

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(rerender(form, errors)),
    };

    let uow = state.begin().await?;
    let registered = {
        let users = uow.users();
        services::accounts::register(&users, state.passwords.as_ref(), credentials).await
    };

    match registered {
        Ok(user) => {
            uow.commit().await?;
            tracing::info!(user_id = user.id, "User registered");
            sign_in(&state, &user)
        }
        Err(DomainError::Duplicate("username")) => {
            uow.rollback().await?;
            Ok(rerender(
                form,
                FormErrors::new().with("username", USERNAME_TAKEN),
            ))
        }
        Err(e) => Err(e.into()),
    }
}
