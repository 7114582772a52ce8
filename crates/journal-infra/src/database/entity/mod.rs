//! SeaORM entities.
//!
//! Relationships are plain foreign keys. The post/category link is its own
//! entity, [`post_category`], mapped onto `association_table`.

pub mod category;
pub mod comment;
pub mod post;
pub mod post_category;
pub mod user;
