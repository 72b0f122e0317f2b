use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError};

extern crate log;
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Auth(auth_error_kind) => {
                debug!("Rejected request: {auth_error_kind:?}");
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
            }
            DomainErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                EntityErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
                EntityErrorKind::Invalid => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                }
                EntityErrorKind::Unauthenticated => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                }
                EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => {
                    error!("Store error: {:?}", self.0.source);
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::Precondition(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            DomainErrorKind::Config | DomainErrorKind::Other(_) => {
                error!("Internal error: {:?}", self.0.source);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
