//! Domain entities - the core business objects.

mod category;
mod comment;
mod credential;
mod post;
mod user;

pub use category::{Category, NewCategory};
pub use comment::{Comment, NewComment};
pub use credential::{LegacyCredential, StoredCredential, Verification};
pub use post::{NewPost, Post, TITLE_MAX_LEN};
pub use user::{NewUser, USERNAME_MAX_LEN, User};
