use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::board::CreateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{board as BoardApi, boards, BoardWithAssociations, Id};

use log::*;

/// GET all boards the caller is a member of
#[utoipa::path(
    get,
    path = "/api/boards",
    responses(
        (status = 200, description = "Successfully retrieved the caller's boards", body = [boards::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Boards for user: {}", user.id);

    let boards = BoardApi::find_by_member(app_state.db_conn_ref(), &user).await?;

    debug!("Found {} Boards", boards.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), boards)))
}

/// POST create a new Board with the caller as its first member
#[utoipa::path(
    post,
    path = "/api/board",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Board", body = BoardWithAssociations),
        (status = 401, description = "Unauthorized"),
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
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Board: {params:?}");

    let board = BoardApi::create(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        params.name,
    )
    .await?;

    debug!("New Board: {}", board.board.id);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), board)))
}

/// GET a Board with its members, columns and cards. Opening a board joins the
/// caller to it.
#[utoipa::path(
    get,
    path = "/api/boards/{id}",
    params(
        ("id" = Uuid, Path, description = "Board id to open")
    ),
    responses(
        (status = 200, description = "Successfully opened a Board", body = BoardWithAssociations),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Board not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Board by id: {id}");

    let board = BoardApi::open(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), board)))
}

/// DELETE the caller's membership of a Board
#[utoipa::path(
    delete,
    path = "/api/boards/{id}/members",
    params(
        ("id" = Uuid, Path, description = "Board id to leave")
    ),
    responses(
        (status = 200, description = "Successfully left the Board", body = BoardWithAssociations),
        (status = 400, description = "User is not a member of the Board"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Board not found"),
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
    debug!("DELETE membership of Board {id} for user {}", user.id);

    let board = BoardApi::leave(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), board)))
}
