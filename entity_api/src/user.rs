use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};

pub use entity::users::Role;

/// Inserts a new user, storing a hash of `user_model.password` in place of the plaintext.
pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!(
        "New User Model to be inserted: username={}, email={}",
        user_model.username, user_model.email
    );

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        name: Set(user_model.name),
        username: Set(user_model.username),
        email: Set(user_model.email),
        password: Set(generate_hash(user_model.password)),
        role: Set(Role::User),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_username(
    db: &impl ConnectionTrait,
    username: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?)
}

/// Lists every registered user, ordered by username.
pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::Username)
        .all(db)
        .await?)
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}
