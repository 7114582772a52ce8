//! # Learning Journal Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use journal_server::config::AppConfig;
use journal_server::handlers;
use journal_server::observability::tag_request;
use journal_server::state::AppState;
use journal_server::telemetry::{self, LogFormat};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(LogFormat::from_env());

    let config = AppConfig::from_env();

    let state = AppState::init(&config).await.map_err(|e| {
        tracing::error!("Failed to initialize database: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    tracing::info!(
        "Starting Learning Journal on {}:{}",
        config.host,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(tag_request))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
