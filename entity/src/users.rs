//! `SeaORM` Entity for the users table.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::roles::Role;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::users::Model)]
#[sea_orm(schema_name = "kanban", table_name = "users")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    pub name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub role: Role,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::board_members::Entity")]
    BoardMembers,
    #[sea_orm(has_many = "super::card_members::Entity")]
    CardMembers,
}

impl Related<super::boards::Entity> for Entity {
    fn to() -> RelationDef {
        super::board_members::Relation::Boards.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::board_members::Relation::Users.def().rev())
    }
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        super::card_members::Relation::Cards.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::card_members::Relation::Users.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
