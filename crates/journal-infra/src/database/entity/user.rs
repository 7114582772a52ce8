//! User entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "String(StringLen::N(255))")]
    pub username: String,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub password: String,
    pub last_logged: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for journal_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password: model.password,
            last_logged: model.last_logged,
        }
    }
}

impl From<journal_core::domain::User> for ActiveModel {
    fn from(user: journal_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            password: Set(user.password),
            last_logged: Set(user.last_logged),
        }
    }
}

impl From<journal_core::domain::NewUser> for ActiveModel {
    fn from(user: journal_core::domain::NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(user.username),
            password: Set(user.password),
            last_logged: Set(user.last_logged),
        }
    }
}
