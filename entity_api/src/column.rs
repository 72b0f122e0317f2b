//! Persistence operations for board columns.

use super::card::{self, CardWithMembers};
use super::error::Error;
use chrono::Utc;
use entity::board_columns::{ActiveModel, Column, Entity, Model};
use entity::{card_members, cards, Id};
use log::*;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, Query},
    ConnectionTrait, QueryOrder, Set, TransactionTrait, Unchanged,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A column together with its cards, each card carrying its members.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct ColumnWithCards {
    #[serde(flatten)]
    pub column: Model,
    pub cards: Vec<CardWithMembers>,
}

pub async fn create(db: &impl ConnectionTrait, name: String, board_id: Id) -> Result<Model, Error> {
    debug!("New Column to be inserted on board {board_id}: {name}");

    let now = Utc::now();
    let column_active_model = ActiveModel {
        name: Set(name),
        board_id: Set(board_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(column_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Renames a column and returns the stored row.
pub async fn update_name(db: &impl ConnectionTrait, id: Id, name: String) -> Result<Model, Error> {
    debug!("Renaming column {id} to {name}");

    let column_active_model = ActiveModel {
        id: Unchanged(id),
        name: Set(name),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };

    Ok(column_active_model.update(db).await?)
}

/// Loads a column with all of its cards and their members.
pub async fn find_with_cards(db: &impl ConnectionTrait, id: Id) -> Result<ColumnWithCards, Error> {
    let column = find_by_id(db, id).await?;
    let cards = card::find_with_members_by_columns(db, vec![column.id]).await?;

    Ok(ColumnWithCards { column, cards })
}

/// Loads every column of a board in creation order, each with its cards and their members.
pub async fn find_with_cards_by_board(
    db: &impl ConnectionTrait,
    board_id: Id,
) -> Result<Vec<ColumnWithCards>, Error> {
    let columns = Entity::find()
        .filter(Column::BoardId.eq(board_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?;

    let column_ids = columns.iter().map(|column| column.id).collect();
    let mut cards = card::find_with_members_by_columns(db, column_ids).await?;

    Ok(columns
        .into_iter()
        .map(|column| {
            let (held, rest): (Vec<_>, Vec<_>) = cards
                .drain(..)
                .partition(|card| card.card.column_id == column.id);
            cards = rest;
            ColumnWithCards {
                column,
                cards: held,
            }
        })
        .collect())
}

/// Deletes a column together with its cards and their member associations, atomically.
pub async fn delete_with_cards(db: &impl TransactionTrait, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    card_members::Entity::delete_many()
        .filter(
            card_members::Column::CardId.in_subquery(
                Query::select()
                    .column(cards::Column::Id)
                    .from(cards::Entity)
                    .and_where(Expr::col(cards::Column::ColumnId).eq(id))
                    .to_owned(),
            ),
        )
        .exec(&txn)
        .await?;

    cards::Entity::delete_many()
        .filter(cards::Column::ColumnId.eq(id))
        .exec(&txn)
        .await?;

    Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::users;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn column_model(board_id: Id, name: &str) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            name: name.to_owned(),
            board_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn card_model(column_id: Id, title: &str) -> cards::Model {
        let now = Utc::now();
        cards::Model {
            id: Id::new_v4(),
            title: title.to_owned(),
            description: String::new(),
            due_date: None,
            column_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_id_issues_a_single_select() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let column_id = Id::new_v4();
        let _ = find_by_id(&db, column_id).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "board_columns"."id", "board_columns"."name", "board_columns"."board_id", "board_columns"."created_at", "board_columns"."updated_at" FROM "kanban"."board_columns" WHERE "board_columns"."id" = $1 LIMIT $2"#,
                [column_id.into(), sea_orm::Value::BigUnsigned(Some(1))]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_with_cards_returns_not_found_for_missing_column() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = find_with_cards(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_with_cards_by_board_groups_cards_under_their_columns() -> Result<(), Error> {
        let board_id = Id::new_v4();
        let todo = column_model(board_id, "To Do");
        let done = column_model(board_id, "Done");
        let first = card_model(todo.id, "first");
        let second = card_model(done.id, "second");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[todo.clone(), done.clone()]])
            .append_query_results([[
                (first.clone(), None::<users::Model>),
                (second.clone(), None::<users::Model>),
            ]])
            .into_connection();

        let columns = find_with_cards_by_board(&db, board_id).await?;

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].column, todo);
        assert_eq!(columns[0].cards.len(), 1);
        assert_eq!(columns[0].cards[0].card, first);
        assert_eq!(columns[1].column, done);
        assert_eq!(columns[1].cards[0].card, second);

        Ok(())
    }

    #[tokio::test]
    async fn find_with_cards_by_board_with_no_columns_issues_one_query() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let columns = find_with_cards_by_board(&db, Id::new_v4()).await?;

        assert!(columns.is_empty());
        assert_eq!(db.into_transaction_log().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_name_returns_the_renamed_column() -> Result<(), Error> {
        let renamed = column_model(Id::new_v4(), "Doing");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[renamed.clone()]])
            .into_connection();

        let updated = update_name(&db, renamed.id, "Doing".to_owned()).await?;

        assert_eq!(updated.name, "Doing");

        Ok(())
    }

    #[tokio::test]
    async fn delete_with_cards_runs_in_one_transaction() -> Result<(), Error> {
        let exec = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(), exec(), exec()])
            .into_connection();

        delete_with_cards(&db, Id::new_v4()).await?;

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let deletes: Vec<String> = log[0]
            .statements()
            .iter()
            .filter(|statement| statement.sql.starts_with("DELETE"))
            .map(|statement| statement.sql.clone())
            .collect();
        assert_eq!(deletes.len(), 3);
        assert!(deletes[0].contains(r#""card_members""#));
        assert!(deletes[1].starts_with(r#"DELETE FROM "kanban"."cards""#));
        assert!(deletes[2].starts_with(r#"DELETE FROM "kanban"."board_columns""#));

        Ok(())
    }
}
