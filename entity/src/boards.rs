//! `SeaORM` Entity for the boards table.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::boards::Model)]
#[sea_orm(schema_name = "kanban", table_name = "boards")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    pub name: String,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::board_columns::Entity")]
    BoardColumns,
    #[sea_orm(has_many = "super::board_members::Entity")]
    BoardMembers,
}

impl Related<super::board_columns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoardColumns.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::board_members::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::board_members::Relation::Boards.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
