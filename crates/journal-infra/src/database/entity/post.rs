//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "String(StringLen::N(128))")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_category::Entity")]
    PostCategory,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostCategory.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_category::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for journal_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            text: model.text,
            created: model.created,
        }
    }
}

impl From<journal_core::domain::Post> for ActiveModel {
    fn from(post: journal_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            text: Set(post.text),
            created: Set(post.created),
        }
    }
}

impl From<journal_core::domain::NewPost> for ActiveModel {
    fn from(post: journal_core::domain::NewPost) -> Self {
        Self {
            id: NotSet,
            title: Set(post.title),
            text: Set(post.text),
            created: Set(post.created),
        }
    }
}
