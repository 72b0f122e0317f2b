use crate::error::Error;
use crate::mutation::{publish_change, require_present};
use crate::{cards, users, CardWithMembers, Id};
use entity_api::{card, column};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::card::{find_by_id, find_with_members};

fn card_updated(card: serde_json::Value) -> DomainEvent {
    DomainEvent::CardUpdated { card }
}

/// Creates a card in an existing column with `actor` as its first member.
pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    card_model: cards::Model,
) -> Result<CardWithMembers, Error> {
    require_present("card title", &card_model.title)?;
    column::find_by_id(db, card_model.column_id).await?;

    let created = card::create_with_member(db, card_model, actor.id).await?;
    info!(
        "User {} created card {} in column {}",
        actor.id, created.id, created.column_id
    );

    let card = card::find_with_members(db, created.id).await?;
    publish_change(publisher, &card, card_updated).await;

    Ok(card)
}

/// Deletes a card and announces it with the members it had just before deletion.
pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    card_id: Id,
) -> Result<CardWithMembers, Error> {
    let pre_image = card::find_with_members(db, card_id).await?;

    card::delete_with_members(db, card_id).await?;
    info!("User {} deleted card {card_id}", actor.id);

    publish_change(publisher, &pre_image, |card| DomainEvent::CardDeleted { card }).await;

    Ok(pre_image)
}

/// Adds `actor` to the card's members.
pub async fn join(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    card_id: Id,
) -> Result<CardWithMembers, Error> {
    let existing = card::find_with_members(db, card_id).await?;
    if existing.has_member(actor.id) {
        return Err(Error::precondition("user already joined"));
    }

    card::add_member(db, card_id, actor.id).await?;
    info!("User {} joined card {card_id}", actor.id);

    let card = card::find_with_members(db, card_id).await?;
    publish_change(publisher, &card, card_updated).await;

    Ok(card)
}

/// Removes `actor` from the card's members.
pub async fn leave(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor: &users::Model,
    card_id: Id,
) -> Result<CardWithMembers, Error> {
    let existing = card::find_with_members(db, card_id).await?;
    if !existing.has_member(actor.id) {
        return Err(Error::precondition("user is not joined"));
    }

    card::remove_member(db, card_id, actor.id).await?;
    info!("User {} left card {card_id}", actor.id);

    let card = card::find_with_members(db, card_id).await?;
    publish_change(publisher, &card, card_updated).await;

    Ok(card)
}
