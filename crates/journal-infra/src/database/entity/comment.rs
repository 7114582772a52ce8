//! Comment entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub thoughts: String,
    pub written: DateTimeUtc,
    pub author_id: i32,
    pub post_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for journal_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            thoughts: model.thoughts,
            written: model.written,
            author_id: model.author_id,
            post_id: model.post_id,
        }
    }
}

impl From<journal_core::domain::Comment> for ActiveModel {
    fn from(comment: journal_core::domain::Comment) -> Self {
        Self {
            id: Set(comment.id),
            thoughts: Set(comment.thoughts),
            written: Set(comment.written),
            author_id: Set(comment.author_id),
            post_id: Set(comment.post_id),
        }
    }
}

impl From<journal_core::domain::NewComment> for ActiveModel {
    fn from(comment: journal_core::domain::NewComment) -> Self {
        Self {
            id: NotSet,
            thoughts: Set(comment.thoughts),
            written: Set(comment.written),
            author_id: Set(comment.author_id),
            post_id: Set(comment.post_id),
        }
    }
}
