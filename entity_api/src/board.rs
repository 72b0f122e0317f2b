//! Persistence operations for boards and their member associations.

use super::column::{self, ColumnWithCards};
use super::error::Error;
use chrono::Utc;
use entity::boards::{ActiveModel, Entity, Model, Relation};
use entity::{board_members, boards, users, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, JoinType, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A board together with its members and columns. This is the shape clients
/// receive in `board_update` events and from the board endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct BoardWithAssociations {
    #[serde(flatten)]
    pub board: Model,
    pub members: Vec<users::Model>,
    pub columns: Vec<ColumnWithCards>,
}

impl BoardWithAssociations {
    pub fn has_member(&self, user_id: Id) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }
}

/// Inserts a board and records `creator_id` as its first member in a single transaction.
pub async fn create_with_member(
    db: &impl TransactionTrait,
    name: String,
    creator_id: Id,
) -> Result<Model, Error> {
    debug!("New Board to be inserted: {name}");

    let txn = db.begin().await?;

    let now = Utc::now();
    let board_active_model = ActiveModel {
        name: Set(name),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let board = board_active_model.insert(&txn).await?;

    add_member(&txn, board.id, creator_id).await?;

    txn.commit().await?;

    Ok(board)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Loads a board with its members, its columns, and every column's cards with their members.
pub async fn find_with_associations(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<BoardWithAssociations, Error> {
    let (board, members) = Entity::find_by_id(id)
        .find_with_related(users::Entity)
        .all(db)
        .await?
        .into_iter()
        .next()
        .ok_or_else(Error::not_found)?;

    let columns = column::find_with_cards_by_board(db, board.id).await?;

    Ok(BoardWithAssociations {
        board,
        members,
        columns,
    })
}

/// Lists the boards `user_id` has joined, oldest first.
pub async fn find_by_member(db: &impl ConnectionTrait, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .join(JoinType::InnerJoin, Relation::BoardMembers.def())
        .filter(board_members::Column::UserId.eq(user_id))
        .order_by_asc(boards::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Adds `user_id` to the board's member set.
pub async fn add_member(
    db: &impl ConnectionTrait,
    board_id: Id,
    user_id: Id,
) -> Result<(), Error> {
    debug!("Adding user {user_id} to board {board_id}");

    board_members::Entity::insert(board_members::ActiveModel {
        board_id: Set(board_id),
        user_id: Set(user_id),
    })
    .exec_without_returning(db)
    .await?;

    Ok(())
}

/// Removes `user_id` from the board's member set. Removing a non-member is a no-op.
pub async fn remove_member(
    db: &impl ConnectionTrait,
    board_id: Id,
    user_id: Id,
) -> Result<(), Error> {
    debug!("Removing user {user_id} from board {board_id}");

    board_members::Entity::delete_many()
        .filter(board_members::Column::BoardId.eq(board_id))
        .filter(board_members::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(())
}
