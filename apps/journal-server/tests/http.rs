//! End-to-end HTTP tests against an in-memory SQLite database.

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;

use journal_infra::database::{DbConn, connect};
use journal_infra::{DatabaseConfig, JwtConfig};
use journal_server::handlers::configure_routes;
use journal_server::state::AppState;
use migration::{Migrator, MigratorTrait};

const CSRF: &str = "integration-csrf-token";

fn app_state(db: DbConn) -> AppState {
    let session = JwtConfig {
        secret: "integration-test-secret".to_string(),
        ..JwtConfig::default()
    };
    AppState::new(db, session, false)
}

async fn journal_state() -> AppState {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    app_state(db)
}

/// A reachable store whose tables were never created, so every query fails.
async fn broken_state() -> AppState {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    app_state(db)
}

macro_rules! journal_app {
    () => {
        journal_app!(journal_state().await)
    };
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

/// POST a CSRF-checked form, sending the matching cookie and field.
macro_rules! submit {
    ($app:expr, $uri:expr, [$($field:expr => $value:expr),* $(,)?] $(, $cookie:expr)?) => {{
        let form: Vec<(&str, &str)> = vec![("csrf_token", CSRF), $(($field, $value)),*];
        let req = test::TestRequest::post()
            .uri($uri)
            .cookie(Cookie::new("csrf_token", CSRF))
            $(.cookie($cookie.clone()))?
            .set_form(form)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

fn auth_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "auth_tkt")
        .map(|c| c.into_owned())
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_health() {
    let app = journal_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[actix_web::test]
async fn test_register_then_login_establishes_identity() {
    let app = journal_app!();

    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(auth_cookie(&resp).is_some());

    let resp = submit!(app, "/login", ["username" => "alice", "password" => "secret123"]);
    assert_eq!(resp.status(), StatusCode::FOUND);
    let identity = auth_cookie(&resp).unwrap();
    assert!(!identity.value().is_empty());

    let req = test::TestRequest::get()
        .uri("/post/new")
        .cookie(identity)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_wrong_password_leaves_identity_unset() {
    let app = journal_app!();
    submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);

    let resp = submit!(app, "/login", ["username" => "alice", "password" => "wrong"]);
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let cleared = auth_cookie(&resp).unwrap();
    assert_eq!(cleared.value(), "");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"][0], "Unable to validate login. Try again.");
    assert_eq!(body["form"]["username"], "alice");
    assert!(body["form"].get("password").is_none());

    let req = test::TestRequest::get().uri("/post/new").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_bearer_token_is_accepted() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let token = auth_cookie(&resp).unwrap().value().to_string();

    let req = test::TestRequest::get()
        .uri("/post/new")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_taken_username_is_a_field_error() {
    let app = journal_app!();
    submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);

    let resp = submit!(app, "/register", ["username" => "alice", "password" => "other"]);
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(auth_cookie(&resp).is_none());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["username"][0], "Username already taken.");
}

#[actix_web::test]
async fn test_csrf_mismatch_is_rejected() {
    let app = journal_app!();

    let req = test::TestRequest::post()
        .uri("/register")
        .cookie(Cookie::new("csrf_token", CSRF))
        .set_form(vec![
            ("csrf_token", "forged"),
            ("username", "mallory"),
            ("password", "secret123"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(vec![
            ("csrf_token", CSRF),
            ("username", "mallory"),
            ("password", "secret123"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing was registered.
    let resp = submit!(app, "/login", ["username" => "mallory", "password" => "secret123"]);
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_form_views_hand_out_csrf_cookie() {
    let app = journal_app!();

    let req = test::TestRequest::get().uri("/register").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "csrf_token")
        .map(|c| c.value().to_string())
        .unwrap();
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["csrf_token"], cookie.as_str());
}

#[actix_web::test]
async fn test_anonymous_cannot_create_or_edit() {
    let app = journal_app!();

    let resp = submit!(app, "/post/new", ["title" => "Hello", "text" => "World"]);
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/post/1/edit")
        .set_form(vec![("title", "Hello"), ("text", "World")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/post/1/edit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"], serde_json::json!([]));
}

#[actix_web::test]
async fn test_duplicate_title_leaves_first_post_unchanged() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    let resp = submit!(app, "/post/new", ["title" => "Hello", "text" => "World"], identity);
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/post/"));

    let resp = submit!(app, "/post/new", ["title" => "Hello", "text" => "Again"], identity);
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["error"][0], "Title must be unique!");
    assert_eq!(body["form"]["text"], "Again");

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Hello");
    assert_eq!(posts[0]["text"], "World");
}

#[actix_web::test]
async fn test_invalid_post_form_is_rerendered() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    let resp = submit!(app, "/post/new", ["title" => "  ", "text" => "World"], identity);
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["title"][0], "This field is required.");
    assert_eq!(body["csrf_token"], CSRF);
}

#[actix_web::test]
async fn test_create_links_categories() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    let resp = submit!(
        app,
        "/post/new",
        ["title" => "First", "text" => "One", "categories" => "rust"],
        identity
    );
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get()
        .uri("/post/new")
        .cookie(identity.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["choices"][0]["name"], "rust");
    let rust_id = body["choices"][0]["id"].as_i64().unwrap().to_string();

    let resp = submit!(
        app,
        "/post/new",
        ["title" => "Second", "text" => "Two", "existing_category" => rust_id.as_str(), "categories" => "travel"],
        identity
    );
    assert_eq!(resp.status(), StatusCode::FOUND);
    let second = location(&resp);

    let req = test::TestRequest::get().uri(&second).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["post"]["categories"], serde_json::json!(["rust", "travel"]));

    let resp = submit!(
        app,
        "/post/new",
        ["title" => "Third", "text" => "Three", "existing_category" => "999"],
        identity
    );
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["existing_category"][0], "Not a valid choice.");
}

#[actix_web::test]
async fn test_edit_updates_title_and_text_only() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    let resp = submit!(
        app,
        "/post/new",
        ["title" => "Hello", "text" => "World", "categories" => "rust"],
        identity
    );
    let detail = location(&resp);
    let edit = format!("{detail}/edit");

    let req = test::TestRequest::get()
        .uri(&edit)
        .cookie(identity.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["form"]["title"], "Hello");

    let req = test::TestRequest::post()
        .uri(&edit)
        .cookie(identity.clone())
        .set_form(vec![
            ("title", "Hello again"),
            ("text", "Edited"),
            ("categories", "travel"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let req = test::TestRequest::get().uri(&detail).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["post"]["title"], "Hello again");
    assert_eq!(body["post"]["text"], "Edited");
    assert_eq!(body["post"]["categories"], serde_json::json!(["rust"]));
}

#[actix_web::test]
async fn test_missing_post_is_not_found() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    let req = test::TestRequest::get().uri("/post/99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);

    let req = test::TestRequest::get()
        .uri("/post/99/edit")
        .cookie(identity.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/post/99/edit")
        .cookie(identity)
        .set_form(vec![("title", "Hello"), ("text", "World")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_flow() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();
    let resp = submit!(app, "/post/new", ["title" => "Hello", "text" => "World"], identity);
    let detail = location(&resp);

    let req = test::TestRequest::get().uri(&detail).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["comments"], serde_json::json!([]));
    assert_eq!(body["form"]["path"], detail.as_str());

    let path = format!("http://localhost{detail}");
    let req = test::TestRequest::post()
        .uri("/comment/add")
        .cookie(identity.clone())
        .set_form(vec![("thoughts", "Nice post"), ("path", path.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["new_comment"]["thoughts"], "Nice post");
    assert_eq!(body["new_comment"]["author"]["username"], "alice");
    assert!(body["new_comment"]["author"].get("password").is_none());

    let req = test::TestRequest::get().uri(&detail).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    assert_eq!(body["comments"][0]["author"]["username"], "alice");
}

#[actix_web::test]
async fn test_comment_failures() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    let req = test::TestRequest::post()
        .uri("/comment/add")
        .set_form(vec![("thoughts", "Hi"), ("path", "/post/1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/comment/add")
        .cookie(identity.clone())
        .set_form(vec![("thoughts", "Hi"), ("path", "/post/42")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FAIL");
    assert_eq!(body["form"]["path"], "/post/42");

    let req = test::TestRequest::post()
        .uri("/comment/add")
        .cookie(identity)
        .set_form(vec![("thoughts", ""), ("path", "/post/42")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FAIL");
    assert_eq!(body["errors"]["thoughts"][0], "This field is required.");
}

#[actix_web::test]
async fn test_comment_store_failure_answers_with_form() {
    let state = broken_state().await;
    let token = state.tokens.generate_token(1, "alice").unwrap();
    let app = journal_app!(state);

    let req = test::TestRequest::post()
        .uri("/comment/add")
        .cookie(Cookie::new("auth_tkt", token))
        .set_form(vec![("thoughts", "Hi"), ("path", "/post/1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "FAIL");
    assert_eq!(body["form"]["thoughts"], "Hi");
    assert_eq!(body["form"]["path"], "/post/1");
    assert!(!body.to_string().to_lowercase().contains("no such table"));
}

#[actix_web::test]
async fn test_store_failure_is_generic_problem() {
    let app = journal_app!(broken_state().await);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "about:blank");
    assert_eq!(body["title"], "Internal Server Error");
    assert_eq!(body["status"], 500);
    assert!(body.get("detail").is_none());
    assert!(!body.to_string().to_lowercase().contains("no such table"));
}

#[actix_web::test]
async fn test_logout_clears_identity() {
    let app = journal_app!();

    let req = test::TestRequest::get().uri("/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert_eq!(auth_cookie(&resp).unwrap().value(), "");
}

#[actix_web::test]
async fn test_list_is_newest_first() {
    let app = journal_app!();
    let resp = submit!(app, "/register", ["username" => "alice", "password" => "secret123"]);
    let identity = auth_cookie(&resp).unwrap();

    submit!(app, "/post/new", ["title" => "Older", "text" => "one"], identity);
    submit!(app, "/post/new", ["title" => "Newer", "text" => "two"], identity);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"][0]["title"], "Newer");
    assert_eq!(body["posts"][1]["title"], "Older");
}
