//! Comment creation.

use crate::domain::{Comment, NewComment, User};
use crate::error::DomainError;
use crate::ports::{BaseRepository, CommentRepository, PostRepository};

/// Leave a comment by `author` on the post `post_id`.
pub async fn add(
    posts: &dyn PostRepository,
    comments: &dyn CommentRepository,
    author: &User,
    post_id: i32,
    thoughts: String,
) -> Result<Comment, DomainError> {
    if posts.find_by_id(post_id).await?.is_none() {
        return Err(DomainError::NotFound {
            entity_type: "Post",
            id: post_id,
        });
    }

    Ok(comments
        .insert(NewComment::new(thoughts, author.id, post_id))
        .await?)
}
