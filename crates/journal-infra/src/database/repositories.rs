//! Entity-specific repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

use journal_core::domain::{Category, Comment, Post, User};
use journal_core::error::RepoError;
use journal_core::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};

use super::base::{SeaRepository, map_db_err};
use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};
use super::entity::user::{self, Entity as UserEntity};

pub type SeaPostRepository<'c, C> = SeaRepository<'c, PostEntity, C>;
pub type SeaUserRepository<'c, C> = SeaRepository<'c, UserEntity, C>;
pub type SeaCommentRepository<'c, C> = SeaRepository<'c, CommentEntity, C>;
pub type SeaCategoryRepository<'c, C> = SeaRepository<'c, CategoryEntity, C>;

#[async_trait]
impl<'c, C> PostRepository for SeaPostRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::Created)
            .order_by_desc(post::Column::Id)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn categories(&self, post_id: i32) -> Result<Vec<Category>, RepoError> {
        let mut grouped = self.categories_for(&[post_id]).await?;
        Ok(grouped.remove(&post_id).unwrap_or_default())
    }

    async fn categories_for(
        &self,
        post_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Category>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = PostCategoryEntity::find()
            .filter(post_category::Column::PostsId.is_in(post_ids.iter().copied()))
            .find_also_related(CategoryEntity)
            .order_by_asc(category::Column::Name)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        let mut grouped: HashMap<i32, Vec<Category>> = HashMap::new();
        for (link, category) in links {
            if let Some(category) = category {
                grouped
                    .entry(link.posts_id)
                    .or_default()
                    .push(category.into());
            }
        }
        Ok(grouped)
    }

    async fn comments(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Written)
            .order_by_asc(comment::Column::Id)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn link_category(&self, post_id: i32, category_id: i32) -> Result<(), RepoError> {
        tracing::debug!(post_id, category_id, "Linking category to post");

        let link = post_category::ActiveModel {
            posts_id: Set(post_id),
            category_id: Set(category_id),
        };
        PostCategoryEntity::insert(link)
            .exec_without_returning(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }
}

#[async_trait]
impl<'c, C> UserRepository for SeaUserRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn my_comments(&self, user_id: i32) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::AuthorId.eq(user_id))
            .order_by_asc(comment::Column::Written)
            .order_by_asc(comment::Column::Id)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl<'c, C> CommentRepository for SeaCommentRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn thread(&self, post_id: i32) -> Result<Vec<(Comment, User)>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::Written)
            .order_by_asc(comment::Column::Id)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        // author_id is a required foreign key, so every row has an author.
        Ok(rows
            .into_iter()
            .filter_map(|(comment, author)| Some((Comment::from(comment), User::from(author?))))
            .collect())
    }
}

#[async_trait]
impl<'c, C> CategoryRepository for SeaCategoryRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn all_by_name(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn posts(&self, category_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .join(JoinType::InnerJoin, post::Relation::PostCategory.def())
            .filter(post_category::Column::CategoryId.eq(category_id))
            .order_by_desc(post::Column::Created)
            .order_by_desc(post::Column::Id)
            .all(self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
