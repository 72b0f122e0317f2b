//! Ties an inbound request to a user. Every protected operation runs this
//! before it touches the store for anything else.

use crate::error::{AuthErrorKind, DomainErrorKind, EntityErrorKind, Error};
use crate::{jwt, users, Id};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, Error> {
    let header = authorization.ok_or_else(|| Error::auth(AuthErrorKind::MissingCredential))?;

    match header.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::auth(AuthErrorKind::MalformedCredential)),
    }
}

/// Resolves the acting user from an `Authorization` header value.
///
/// The credential is parsed and verified before the store is consulted, so a
/// missing, malformed or expired token never reaches the database.
///
/// # Errors
///
/// Returns an `Auth` error when the header is absent or malformed, the token
/// fails verification, or its subject is not a known user. Store failures
/// while looking up the subject propagate as entity errors.
pub async fn authorize(
    db: &DatabaseConnection,
    config: &Config,
    authorization: Option<&str>,
) -> Result<users::Model, Error> {
    let token = bearer_token(authorization)?;
    let claims = jwt::verify_session_token(config, token)?;

    let user_id = Id::parse_str(&claims.sub).map_err(|_| {
        warn!("Session token subject is not a user id: {}", claims.sub);
        Error::auth(AuthErrorKind::InvalidToken)
    })?;

    match entity_api::user::find_by_id(db, user_id).await {
        Ok(user) => Ok(user),
        Err(err) => {
            let err = Error::from(err);
            if err.error_kind == DomainErrorKind::Entity(EntityErrorKind::NotFound) {
                warn!("Session token subject {user_id} no longer exists");
                Err(Error::auth(AuthErrorKind::UnknownSubject))
            } else {
                Err(err)
            }
        }
    }
}
