use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{
    Category, Comment, NewCategory, NewComment, NewPost, NewUser, Post, User,
};
use crate::error::RepoError;

/// Operations every entity repository supports.
///
/// `N` is the not-yet-stored shape; the store assigns the id on insert.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its id. Absence is `Ok(None)`, never an error.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it with its assigned id.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i32> {
    /// Every post, newest first.
    async fn all(&self) -> Result<Vec<Post>, RepoError>;

    /// Categories of one post, sorted by name.
    async fn categories(&self, post_id: i32) -> Result<Vec<Category>, RepoError>;

    /// Categories of several posts at once, keyed by post id.
    async fn categories_for(
        &self,
        post_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Category>>, RepoError>;

    /// Comments left on a post, oldest first.
    async fn comments(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    /// Add a row to the post/category association.
    async fn link_category(&self, post_id: i32, category_id: i32) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i32> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Comments this user has written, oldest first.
    async fn my_comments(&self, user_id: i32) -> Result<Vec<Comment>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, NewComment, i32> {
    /// Comments on a post paired with their authors, oldest first.
    async fn thread(&self, post_id: i32) -> Result<Vec<(Comment, User)>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, NewCategory, i32> {
    /// Every category, sorted by name.
    async fn all_by_name(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    /// Posts tagged with a category, newest first.
    async fn posts(&self, category_id: i32) -> Result<Vec<Post>, RepoError>;
}
