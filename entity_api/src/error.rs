//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::{DbErr, SqlErr};

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Invalid search term
    InvalidQueryTerm,
    // Record not found
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // Record not authenticated
    RecordUnauthenticated,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
    // A unique constraint rejected the write
    ValidationError,
    // Other errors
    Other,
}

impl Error {
    pub(crate) fn not_found() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::ValidationError,
            };
        }

        match err {
            DbErr::RecordNotFound(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::RecordNotFound,
            },
            DbErr::RecordNotUpdated => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::RecordNotUpdated,
            },
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) | DbErr::Exec(_) => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::SystemError,
            },
            _ => Error {
                source: Some(err),
                error_kind: EntityApiErrorKind::SystemError,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_record_not_found_kind() {
        let err: Error = DbErr::RecordNotFound("card".to_string()).into();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
        assert!(err.source.is_some());
    }

    #[test]
    fn connection_failures_map_to_system_error() {
        let err: Error = DbErr::Custom("connection reset".to_string()).into();
        assert_eq!(err.error_kind, EntityApiErrorKind::SystemError);
    }

    #[test]
    fn record_not_updated_is_preserved() {
        let err: Error = DbErr::RecordNotUpdated.into();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotUpdated);
    }
}
