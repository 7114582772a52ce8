//! Request-scoped observability.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, tag_request};
