use crate::error::{AuthErrorKind, DomainErrorKind, EntityErrorKind, Error};
use crate::mutation::require_present;
use crate::{jwt, users};
use email_address::EmailAddress;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use service::config::Config;
use utoipa::ToSchema;

pub use entity_api::user::{find_all, find_by_email, find_by_id, find_by_username};

#[derive(Debug, Clone, ToSchema, Deserialize)]
#[schema(as = domain::user::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Creates an account with the `user` role.
///
/// # Errors
///
/// Blank fields or an invalid email address are `Invalid`. An email address or
/// username that is already taken is a precondition error.
pub async fn register(
    db: &DatabaseConnection,
    user_model: users::Model,
) -> Result<users::Model, Error> {
    require_present("name", &user_model.name)?;
    require_present("username", &user_model.username)?;
    require_present("password", &user_model.password)?;

    if !EmailAddress::is_valid(&user_model.email) {
        debug!("Rejected registration with invalid email address");
        return Err(Error::invalid());
    }

    if find_by_email(db, &user_model.email).await?.is_some() {
        return Err(Error::precondition("email already registered"));
    }

    if find_by_username(db, &user_model.username).await?.is_some() {
        return Err(Error::precondition("username already registered"));
    }

    let user = entity_api::user::create(db, user_model).await?;
    info!("Registered user {} ({})", user.id, user.username);

    Ok(user)
}

/// Verifies a username and password pair and issues a session token.
///
/// An unknown username and a wrong password produce the same error.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    credentials: Credentials,
) -> Result<jwt::Jwt, Error> {
    let user = find_by_username(db, &credentials.username)
        .await?
        .ok_or_else(|| Error::auth(AuthErrorKind::InvalidCredentials))?;

    entity_api::user::verify_password(&credentials.password, &user.password)
        .await
        .map_err(|err| match Error::from(err) {
            Error {
                error_kind: DomainErrorKind::Entity(EntityErrorKind::Unauthenticated),
                ..
            } => Error::auth(AuthErrorKind::InvalidCredentials),
            other => other,
        })?;

    info!("User {} logged in", user.id);
    jwt::issue_session_token(config, &user)
}
