use crate::{AppState, Error};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::{authorization, users};
use log::*;

pub(crate) struct AuthenticatedUser(pub users::Model);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Error;

    // Resolves the caller from the `Authorization: Bearer <token>` header. Any
    // failure rejects the request before the handler body runs, so no mutation
    // is attempted for an unauthorized caller.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let user = authorization::authorize(state.db_conn_ref(), state.config(), header).await?;
        trace!("Authenticated user {}", user.id);

        Ok(AuthenticatedUser(user))
    }
}
