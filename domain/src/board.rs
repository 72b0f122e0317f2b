use crate::error::Error;
use crate::mutation::{publish_change, require_present};
use crate::{boards, users, BoardWithAssociations, Id};
use entity_api::board;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::board::{find_by_id, find_with_associations};

fn board_updated(board: serde_json::Value) -> DomainEvent {
    DomainEvent::BoardUpdated { board }
}

/// Creates a board with `actor` as its first member and announces it.
pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    name: String,
) -> Result<BoardWithAssociations, Error> {
    require_present("board name", &name)?;

    let created = board::create_with_member(db, name, actor.id).await?;
    info!("User {} created board {}", actor.id, created.id);

    let board = board::find_with_associations(db, created.id).await?;
    publish_change(publisher, &board, board_updated).await;

    Ok(board)
}

/// Loads a board for `actor`, joining them to it first if they are not yet a member.
///
/// A `board_update` is published only when the member set changed.
pub async fn open(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    board_id: Id,
) -> Result<BoardWithAssociations, Error> {
    let board = board::find_with_associations(db, board_id).await?;
    if board.has_member(actor.id) {
        return Ok(board);
    }

    board::add_member(db, board_id, actor.id).await?;
    info!("User {} joined board {board_id}", actor.id);

    let board = board::find_with_associations(db, board_id).await?;
    publish_change(publisher, &board, board_updated).await;

    Ok(board)
}

/// Removes `actor` from a board they are a member of.
pub async fn leave(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    board_id: Id,
) -> Result<BoardWithAssociations, Error> {
    let board = board::find_with_associations(db, board_id).await?;
    if !board.has_member(actor.id) {
        return Err(Error::precondition("user is not joined"));
    }

    board::remove_member(db, board_id, actor.id).await?;
    info!("User {} left board {board_id}", actor.id);

    let board = board::find_with_associations(db, board_id).await?;
    publish_change(publisher, &board, board_updated).await;

    Ok(board)
}

/// The boards `actor` has joined.
pub async fn find_by_member(
    db: &DatabaseConnection,
    actor: &users::Model,
) -> Result<Vec<boards::Model>, Error> {
    Ok(board::find_by_member(db, actor.id).await?)
}
