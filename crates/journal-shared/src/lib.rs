//! # Journal Shared
//!
//! Wire shapes shared by the server and its clients: entity payloads and the
//! error body.

pub mod dto;
pub mod response;

pub use dto::{CategoryPayload, CommentPayload, PostPayload, UserPayload};
pub use response::ErrorResponse;
