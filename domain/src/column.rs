use crate::error::Error;
use crate::mutation::{publish_change, require_present};
use crate::{board_columns, users, BoardWithAssociations, ColumnWithCards, Id};
use entity_api::{board, column};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::column::{find_by_id, find_with_cards};

fn column_updated(column: serde_json::Value) -> DomainEvent {
    DomainEvent::ColumnUpdated { column }
}

/// Adds a column to an existing board and announces it.
pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    column_model: board_columns::Model,
) -> Result<ColumnWithCards, Error> {
    require_present("column name", &column_model.name)?;
    let parent = board::find_by_id(db, column_model.board_id).await?;

    let created = column::create(db, column_model.name, parent.id).await?;
    info!(
        "User {} added column {} to board {}",
        actor.id, created.id, parent.id
    );

    let column = column::find_with_cards(db, created.id).await?;
    publish_change(publisher, &column, column_updated).await;

    Ok(column)
}

/// Renames a column and announces the change.
pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    column_id: Id,
    name: String,
) -> Result<ColumnWithCards, Error> {
    require_present("column name", &name)?;
    let existing = column::find_by_id(db, column_id).await?;

    column::update_name(db, existing.id, name).await?;
    info!("User {} renamed column {column_id}", actor.id);

    let column = column::find_with_cards(db, column_id).await?;
    publish_change(publisher, &column, column_updated).await;

    Ok(column)
}

/// Deletes a column with all of its cards and announces the parent board.
pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    column_id: Id,
) -> Result<BoardWithAssociations, Error> {
    let existing = column::find_by_id(db, column_id).await?;

    column::delete_with_cards(db, existing.id).await?;
    info!(
        "User {} deleted column {column_id} from board {}",
        actor.id, existing.board_id
    );

    let board = board::find_with_associations(db, existing.board_id).await?;
    publish_change(publisher, &board, |board| DomainEvent::BoardUpdated { board }).await;

    Ok(board)
}
