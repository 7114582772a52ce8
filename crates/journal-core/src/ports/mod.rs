//! Ports - trait definitions for external dependencies.
//! Infrastructure implements these; services and handlers only see the traits.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};
