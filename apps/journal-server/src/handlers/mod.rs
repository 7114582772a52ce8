//! HTTP handlers and route configuration.
//!
//! Every resource is named after its entry in the permission table; the
//! [`Authorized`](crate::middleware::auth::Authorized) extractor looks the
//! name up to decide who may call it.

mod auth;
mod comments;
mod health;
mod posts;

use actix_web::{HttpResponse, HttpResponseBuilder, http::header, web};

use journal_core::permissions::Route;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .name(Route::Home.name())
            .route(web::get().to(posts::list)),
    )
    // Registered before `/post/{id}` so "new" is not taken for an id.
    .service(
        web::resource("/post/new")
            .name(Route::AddEntry.name())
            .route(web::get().to(posts::create_form))
            .route(web::post().to(posts::create)),
    )
    .service(
        web::resource("/post/{id}")
            .name(Route::Detail.name())
            .route(web::get().to(posts::detail)),
    )
    .service(
        web::resource("/post/{id}/edit")
            .name(Route::Edit.name())
            .route(web::get().to(posts::edit_form))
            .route(web::post().to(posts::edit)),
    )
    .service(
        web::resource("/login")
            .name(Route::Login.name())
            .route(web::get().to(auth::login_form))
            .route(web::post().to(auth::login)),
    )
    .service(
        web::resource("/logout")
            .name(Route::Logout.name())
            .route(web::get().to(auth::logout)),
    )
    .service(
        web::resource("/register")
            .name(Route::Register.name())
            .route(web::get().to(auth::register_form))
            .route(web::post().to(auth::register)),
    )
    .service(
        web::resource("/comment/add")
            .name(Route::AddComment.name())
            .route(web::post().to(comments::add)),
    )
    .route("/health", web::get().to(health::health_check));
}

/// 302 to `location`, open for more headers.
fn found(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header((header::LOCATION, location));
    builder
}

fn redirect(location: &str) -> HttpResponse {
    found(location).finish()
}

fn detail_path(id: i32) -> String {
    format!("/post/{id}")
}
