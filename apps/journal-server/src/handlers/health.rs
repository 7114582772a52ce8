//! Liveness endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub database: &'static str,
}

/// GET /health
///
/// 503 with `"status": "degraded"` when the database does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database_up = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            false
        }
    };

    let body = HealthResponse {
        status: if database_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: if database_up { "up" } else { "down" },
    };

    if database_up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
