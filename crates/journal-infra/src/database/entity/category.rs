//! Category entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_category::Entity")]
    PostCategory,
}

impl Related<super::post_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostCategory.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_category::Relation::Post.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for journal_core::domain::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<journal_core::domain::Category> for ActiveModel {
    fn from(category: journal_core::domain::Category) -> Self {
        Self {
            id: Set(category.id),
            name: Set(category.name),
        }
    }
}

impl From<journal_core::domain::NewCategory> for ActiveModel {
    fn from(category: journal_core::domain::NewCategory) -> Self {
        Self {
            id: NotSet,
            name: Set(category.into_name()),
        }
    }
}
