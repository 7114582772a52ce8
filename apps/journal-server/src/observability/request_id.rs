//! Request IDs: every request runs inside a `request` span carrying an ID,
//! and the ID is echoed back in `X-Request-ID`.

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID, both ways.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse the caller's ID if it sent a usable one, otherwise mint one.
fn request_id(req: &ServiceRequest) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware function; mount with `middleware::from_fn(tag_request)`.
pub async fn tag_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let id = request_id(&req);
    let span = tracing::info_span!("request", request_id = %id);

    let mut res = next.call(req).instrument(span).await?;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}
