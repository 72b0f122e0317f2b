//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api`, and `web` is dependent on `domain`.
/// but `web` should not be dependent, directly, on `entity_api`. Each layer is free to define its own
/// error kinds to whatever richeness needed at that layer. Ultimately the various `error_kind`s are used
/// by `web` to return appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Entity(EntityErrorKind),
    Auth(AuthErrorKind),
    /// The request is well formed but conflicts with the current state,
    /// e.g. joining a card twice. The message is shown to the client.
    Precondition(String),
    Config,
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Unauthenticated,
    DbTransaction,
    Other(String),
}

/// Reasons a request could not be tied to a user.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// No `Authorization` header was sent.
    MissingCredential,
    /// The header is not of the form `Bearer <token>`.
    MalformedCredential,
    /// The token failed signature or claims validation.
    InvalidToken,
    ExpiredToken,
    /// The token is valid but its subject is not a known user.
    UnknownSubject,
    /// Login with an unknown username or a wrong password.
    InvalidCredentials,
}

impl Error {
    pub fn auth(kind: AuthErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Auth(kind),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Precondition(message.into()),
        }
    }

    pub fn invalid() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Entity(EntityErrorKind::Invalid),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api`` layer to the `domain`` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm | EntityApiErrorKind::ValidationError => {
                EntityErrorKind::Invalid
            }
            EntityApiErrorKind::RecordUnauthenticated => EntityErrorKind::Unauthenticated,
            EntityApiErrorKind::SystemError | EntityApiErrorKind::RecordNotUpdated => {
                EntityErrorKind::DbTransaction
            }
            EntityApiErrorKind::Other => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Entity(entity_error_kind),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let auth_error_kind = match err.kind() {
            ErrorKind::ExpiredSignature => AuthErrorKind::ExpiredToken,
            _ => AuthErrorKind::InvalidToken,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Auth(auth_error_kind),
        }
    }
}
