//! Post queries and mutations.

use crate::domain::{Category, NewCategory, NewPost, Post};
use crate::error::{DomainError, RepoError};
use crate::forms::ValidPost;
use crate::ports::{BaseRepository, CategoryRepository, PostRepository};

use super::unique;

/// All posts, most recently created first.
pub async fn all(posts: &dyn PostRepository) -> Result<Vec<Post>, DomainError> {
    Ok(posts.all().await?)
}

/// One post, or `None` when the id is unknown.
pub async fn by_id(posts: &dyn PostRepository, id: i32) -> Result<Option<Post>, DomainError> {
    Ok(posts.find_by_id(id).await?)
}

/// `(id, name)` of every category, sorted by name.
pub async fn get_choices(
    categories: &dyn CategoryRepository,
) -> Result<Vec<(i32, String)>, DomainError> {
    Ok(categories
        .all_by_name()
        .await?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect())
}

/// Store a new post and link the categories the form asked for.
///
/// A title already in use fails with `Duplicate("title")`.
pub async fn create(
    posts: &dyn PostRepository,
    categories: &dyn CategoryRepository,
    form: ValidPost,
) -> Result<Post, DomainError> {
    let post = posts
        .insert(NewPost::new(form.title, form.text))
        .await
        .map_err(unique("title"))?;

    let mut linked = Vec::with_capacity(2);
    if let Some(id) = form.existing_category {
        linked.push(id);
    }
    if let Some(new_category) = form.new_category {
        let category = find_or_create_category(categories, new_category).await?;
        if !linked.contains(&category.id) {
            linked.push(category.id);
        }
    }
    for category_id in linked {
        posts.link_category(post.id, category_id).await?;
    }

    Ok(post)
}

/// Overwrite title and text of an existing post.
///
/// Category selections in the form are not applied.
pub async fn modify(
    posts: &dyn PostRepository,
    form: &ValidPost,
    id: i32,
) -> Result<Post, DomainError> {
    let not_found = || DomainError::NotFound {
        entity_type: "Post",
        id,
    };

    let mut post = posts.find_by_id(id).await?.ok_or_else(not_found)?;
    post.title = form.title.clone();
    post.text = form.text.clone();

    posts.update(post).await.map_err(|err| match err {
        RepoError::NotFound => not_found(),
        other => unique("title")(other),
    })
}

/// The category with this name, created if it does not exist yet.
pub async fn find_or_create_category(
    categories: &dyn CategoryRepository,
    new_category: NewCategory,
) -> Result<Category, DomainError> {
    if let Some(existing) = categories.find_by_name(new_category.name()).await? {
        return Ok(existing);
    }
    categories
        .insert(new_category)
        .await
        .map_err(unique("category"))
}
