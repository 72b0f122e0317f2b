use chrono::Utc;
use log::*;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{board_columns, board_members, boards, card_members, cards, jwts, users, Id};

pub mod board;
pub mod card;
pub mod column;
pub mod error;
pub mod user;

pub fn uuid_parse_str(uuid_str: &str) -> Result<Id, error::Error> {
    Id::parse_str(uuid_str).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}

/// Populates an empty database with two users sharing a board of three columns and one card.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let now = Utc::now();

    let admin = users::ActiveModel {
        name: Set("Admin User".to_owned()),
        username: Set("admin".to_owned()),
        email: Set("admin@kanban.local".to_owned()),
        password: Set(user::generate_hash("dLxNxnjn&b!2sqkwFbb4s8jX".to_owned())),
        role: Set(users::Role::Admin),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let ada = users::ActiveModel {
        name: Set("Ada Lovelace".to_owned()),
        username: Set("ada".to_owned()),
        email: Set("ada@kanban.local".to_owned()),
        password: Set(user::generate_hash("password".to_owned())),
        role: Set(users::Role::User),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let roadmap = board::create_with_member(db, "Roadmap".to_owned(), admin.id).await?;
    board::add_member(db, roadmap.id, ada.id).await?;

    let mut column_ids = Vec::new();
    for name in ["To Do", "In Progress", "Done"] {
        let column = column::create(db, name.to_owned(), roadmap.id).await?;
        column_ids.push(column.id);
    }

    let card = card::create_with_member(
        db,
        cards::Model {
            id: Id::nil(),
            title: "Wire up the event stream".to_owned(),
            description: "Every mutation should reach every open board.".to_owned(),
            due_date: None,
            column_id: column_ids[0],
            created_at: now.into(),
            updated_at: now.into(),
        },
        ada.id,
    )
    .await?;

    info!(
        "Seeded board {} with {} columns and card {}",
        roadmap.id,
        column_ids.len(),
        card.id
    );

    Ok(())
}
