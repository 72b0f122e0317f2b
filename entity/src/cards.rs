//! `SeaORM` Entity for the cards table.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::cards::Model)]
#[sea_orm(schema_name = "kanban", table_name = "cards")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub due_date: Option<String>,
    #[schema(value_type = String, format = Uuid)]
    pub column_id: Id,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::board_columns::Entity",
        from = "Column::ColumnId",
        to = "super::board_columns::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    BoardColumns,
    #[sea_orm(has_many = "super::card_members::Entity")]
    CardMembers,
}

impl Related<super::board_columns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoardColumns.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::card_members::Relation::Users.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::card_members::Relation::Cards.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
