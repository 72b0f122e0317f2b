//! Session tokens: HS256-signed JWTs issued at login and presented as
//! `Authorization: Bearer <token>` on every protected request.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::jwt::{issue_session_token, verify_session_token};
//!
//! let jwt = issue_session_token(&config, &user)?;
//! let claims = verify_session_token(&config, &jwt.token)?;
//! assert_eq!(claims.sub, user.id.to_string());
//! ```

use crate::error::{DomainErrorKind, Error};
use crate::users;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;

pub use claims::SessionClaims;
// re-export the Jwt struct from the entity module
pub use entity::jwts::Jwt;

pub mod claims;

fn signing_secret(config: &Config) -> Result<&str, Error> {
    config.jwt_secret().ok_or_else(|| {
        warn!("No JWT secret configured, session tokens cannot be issued or verified");
        Error {
            source: None,
            error_kind: DomainErrorKind::Config,
        }
    })
}

/// Issues a session token for `user` that expires `config.token_expiry_seconds` from now.
pub fn issue_session_token(config: &Config, user: &users::Model) -> Result<Jwt, Error> {
    let secret = signing_secret(config)?;
    let now = Utc::now().timestamp().max(0) as u64;

    let claims = SessionClaims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.to_string(),
        iat: now,
        exp: now.saturating_add(config.token_expiry_seconds),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Other("Failed to sign session token".to_string()),
    })?;

    Ok(Jwt {
        token,
        sub: claims.sub,
    })
}

/// Verifies signature and expiry of a session token and returns its claims.
pub fn verify_session_token(config: &Config, token: &str) -> Result<SessionClaims, Error> {
    let secret = signing_secret(config)?;
    let mut validation = Validation::new(Algorithm::HS256);
    // A token is expired the second after `exp`, with no grace period.
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;
    use crate::Id;
    use clap::Parser;
    use entity::users::Role;

    fn config() -> Config {
        Config::parse_from(["kanban_board_rs"]).set_jwt_secret("test-secret".to_string())
    }

    fn user() -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Id::new_v4(),
            name: "Ada Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@test.com".to_string(),
            password: "hash".to_string(),
            role: Role::User,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn issued_token_verifies_and_carries_the_user() {
        let config = config();
        let user = user();

        let jwt = issue_session_token(&config, &user).unwrap();
        let claims = verify_session_token(&config, &jwt.token).unwrap();

        assert_eq!(jwt.sub, user.id.to_string());
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, config.token_expiry_seconds);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let jwt = issue_session_token(&config(), &user()).unwrap();
        let other = config().set_jwt_secret("another-secret".to_string());

        let err = verify_session_token(&other, &jwt.token).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Auth(AuthErrorKind::InvalidToken)
        );
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let config = config();
        let now = Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: Id::new_v4().to_string(),
            username: "ada".to_string(),
            role: "user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = verify_session_token(&config, &token).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Auth(AuthErrorKind::ExpiredToken)
        );
    }

    #[test]
    fn token_expired_one_second_ago_is_rejected() {
        let config = config();
        let now = Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: Id::new_v4().to_string(),
            username: "ada".to_string(),
            role: "user".to_string(),
            iat: now - 60,
            exp: now - 1,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = verify_session_token(&config, &token).unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Auth(AuthErrorKind::ExpiredToken)
        );
    }

    #[test]
    fn huge_token_expiry_saturates_instead_of_overflowing() {
        let config = Config::parse_from([
            "kanban_board_rs",
            "--token-expiry-seconds",
            &u64::MAX.to_string(),
        ])
        .set_jwt_secret("test-secret".to_string());

        let jwt = issue_session_token(&config, &user()).unwrap();
        let claims = verify_session_token(&config, &jwt.token).unwrap();

        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn garbage_is_rejected_as_invalid() {
        let err = verify_session_token(&config(), "not.a.jwt").unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Auth(AuthErrorKind::InvalidToken)
        );
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let config = Config::parse_from(["kanban_board_rs"]);
        let err = issue_session_token(&config, &user()).unwrap_err();
        assert_eq!(err.error_kind, DomainErrorKind::Config);
    }
}
