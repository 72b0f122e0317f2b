//! Persistence operations for cards and their member associations.

use super::error::Error;
use chrono::Utc;
use entity::cards::{ActiveModel, Column, Entity, Model};
use entity::{card_members, users, Id};
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set, TransactionTrait};
use serde::Serialize;
use utoipa::ToSchema;

/// A card together with the users that joined it. This is the shape clients
/// receive in `card_update` and `card_deleted` events.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct CardWithMembers {
    #[serde(flatten)]
    pub card: Model,
    pub members: Vec<users::Model>,
}

impl From<(Model, Vec<users::Model>)> for CardWithMembers {
    fn from((card, members): (Model, Vec<users::Model>)) -> Self {
        Self { card, members }
    }
}

impl CardWithMembers {
    pub fn has_member(&self, user_id: Id) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }
}

/// Inserts a card and records `creator_id` as its first member in a single transaction.
pub async fn create_with_member(
    db: &impl TransactionTrait,
    card_model: Model,
    creator_id: Id,
) -> Result<Model, Error> {
    debug!("New Card Model to be inserted: {card_model:?}");

    let txn = db.begin().await?;

    let now = Utc::now();
    let card_active_model = ActiveModel {
        title: Set(card_model.title),
        description: Set(card_model.description),
        due_date: Set(card_model.due_date),
        column_id: Set(card_model.column_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let card = card_active_model.insert(&txn).await?;

    add_member(&txn, card.id, creator_id).await?;

    txn.commit().await?;

    Ok(card)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Loads a card with its current member set.
pub async fn find_with_members(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<CardWithMembers, Error> {
    Entity::find_by_id(id)
        .find_with_related(users::Entity)
        .all(db)
        .await?
        .into_iter()
        .next()
        .map(CardWithMembers::from)
        .ok_or_else(Error::not_found)
}

/// Loads every card held by any of `column_ids`, each with its member set.
pub async fn find_with_members_by_columns(
    db: &impl ConnectionTrait,
    column_ids: Vec<Id>,
) -> Result<Vec<CardWithMembers>, Error> {
    if column_ids.is_empty() {
        return Ok(Vec::new());
    }

    let cards = Entity::find()
        .filter(Column::ColumnId.is_in(column_ids))
        .order_by_asc(Column::CreatedAt)
        .find_with_related(users::Entity)
        .all(db)
        .await?;

    Ok(cards.into_iter().map(CardWithMembers::from).collect())
}

/// Adds `user_id` to the card's member set.
pub async fn add_member(db: &impl ConnectionTrait, card_id: Id, user_id: Id) -> Result<(), Error> {
    debug!("Adding user {user_id} to card {card_id}");

    card_members::Entity::insert(card_members::ActiveModel {
        card_id: Set(card_id),
        user_id: Set(user_id),
    })
    .exec_without_returning(db)
    .await?;

    Ok(())
}

/// Removes `user_id` from the card's member set. Removing a non-member is a no-op.
pub async fn remove_member(
    db: &impl ConnectionTrait,
    card_id: Id,
    user_id: Id,
) -> Result<(), Error> {
    debug!("Removing user {user_id} from card {card_id}");

    card_members::Entity::delete_many()
        .filter(card_members::Column::CardId.eq(card_id))
        .filter(card_members::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(())
}

/// Clears the card's member associations and then deletes the card, atomically.
pub async fn delete_with_members(db: &impl TransactionTrait, id: Id) -> Result<(), Error> {
    let txn = db.begin().await?;

    card_members::Entity::delete_many()
        .filter(card_members::Column::CardId.eq(id))
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
    use entity::users::Role;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn card_model(column_id: Id) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            title: "Write release notes".to_owned(),
            description: "Cover the SSE changes".to_owned(),
            due_date: Some("2026-11-01".to_owned()),
            column_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn user_model(username: &str) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Id::new_v4(),
            name: username.to_owned(),
            username: username.to_owned(),
            email: format!("{username}@test.com"),
            password: "hash".to_owned(),
            role: Role::User,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_id_issues_a_single_select() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let card_id = Id::new_v4();
        let _ = find_by_id(&db, card_id).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "cards"."id", "cards"."title", "cards"."description", "cards"."due_date", "cards"."column_id", "cards"."created_at", "cards"."updated_at" FROM "kanban"."cards" WHERE "cards"."id" = $1 LIMIT $2"#,
                [card_id.into(), sea_orm::Value::BigUnsigned(Some(1))]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_with_members_collects_every_member() -> Result<(), Error> {
        let card = card_model(Id::new_v4());
        let ada = user_model("ada");
        let grace = user_model("grace");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                (card.clone(), ada.clone()),
                (card.clone(), grace.clone()),
            ]])
            .into_connection();

        let loaded = find_with_members(&db, card.id).await?;

        assert_eq!(loaded.card, card);
        assert_eq!(loaded.members, vec![ada.clone(), grace]);
        assert!(loaded.has_member(ada.id));
        assert!(!loaded.has_member(Id::new_v4()));

        Ok(())
    }

    #[tokio::test]
    async fn find_with_members_returns_not_found_for_missing_card() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<(Model, Option<users::Model>)>::new()])
            .into_connection();

        let result = find_with_members(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_with_members_by_columns_skips_the_query_for_no_columns() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let cards = find_with_members_by_columns(&db, Vec::new()).await?;

        assert!(cards.is_empty());
        assert!(db.into_transaction_log().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_with_member_inserts_card_and_membership() -> Result<(), Error> {
        let card = card_model(Id::new_v4());
        let creator = user_model("ada");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[card.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let created = create_with_member(&db, card.clone(), creator.id).await?;

        assert_eq!(created.id, card.id);
        assert_eq!(created.title, card.title);

        Ok(())
    }

    #[tokio::test]
    async fn delete_with_members_clears_members_before_the_card() -> Result<(), Error> {
        let card_id = Id::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        delete_with_members(&db, card_id).await?;

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements: Vec<String> = log[0]
            .statements()
            .iter()
            .map(|statement| statement.sql.clone())
            .collect();
        let members_delete = statements
            .iter()
            .position(|sql| sql.starts_with(r#"DELETE FROM "kanban"."card_members""#));
        let card_delete = statements
            .iter()
            .position(|sql| sql.starts_with(r#"DELETE FROM "kanban"."cards""#));
        assert!(members_delete.is_some());
        assert!(members_delete < card_delete);

        Ok(())
    }

    #[tokio::test]
    async fn remove_member_filters_by_card_and_user() -> Result<(), Error> {
        let card_id = Id::new_v4();
        let user_id = Id::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        remove_member(&db, card_id, user_id).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "kanban"."card_members" WHERE "card_members"."card_id" = $1 AND "card_members"."user_id" = $2"#,
                [card_id.into(), user_id.into()]
            )]
        );

        Ok(())
    }
}
