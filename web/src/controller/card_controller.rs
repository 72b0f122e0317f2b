use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{card as CardApi, cards, CardWithMembers, Id};

use log::*;

/// POST create a new Card in a Column. The caller becomes its first member.
#[utoipa::path(
    post,
    path = "/api/cards",
    request_body = cards::Model,
    responses(
        (status = 201, description = "Successfully Created a New Card", body = CardWithMembers),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Column not found"),
        (status = 405, description = "Method not allowed"),
        (status = 422, description = "Unprocessable Entity")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(card_model): Json<cards::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Card: {card_model:?}");

    let card = CardApi::create(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        card_model,
    )
    .await?;

    debug!("New Card: {}", card.card.id);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), card)))
}

/// DELETE a Card. Responds with the Card as it was before deletion.
#[utoipa::path(
    delete,
    path = "/api/cards/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Card to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Card", body = CardWithMembers),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Card not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Card by id: {id}");

    let card = CardApi::delete(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), card)))
}

/// POST join the caller to a Card
#[utoipa::path(
    post,
    path = "/api/cards/{id}/members",
    params(
        ("id" = Uuid, Path, description = "Id of the Card to join"),
    ),
    responses(
        (status = 200, description = "Successfully joined the Card", body = CardWithMembers),
        (status = 400, description = "User already joined"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Card not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn join(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST join Card {id} for user {}", user.id);

    let card = CardApi::join(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), card)))
}

/// DELETE the caller's membership of a Card
#[utoipa::path(
    delete,
    path = "/api/cards/{id}/members",
    params(
        ("id" = Uuid, Path, description = "Id of the Card to leave"),
    ),
    responses(
        (status = 200, description = "Successfully left the Card", body = CardWithMembers),
        (status = 400, description = "User is not joined"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Card not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn leave(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE membership of Card {id} for user {}", user.id);

    let card = CardApi::leave(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), card)))
}
