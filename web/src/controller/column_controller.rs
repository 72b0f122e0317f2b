use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::column::UpdateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{board_columns, column as ColumnApi, BoardWithAssociations, ColumnWithCards, Id};

use log::*;

/// POST create a new Column on a Board
#[utoipa::path(
    post,
    path = "/api/column",
    request_body = board_columns::Model,
    responses(
        (status = 201, description = "Successfully Created a New Column", body = ColumnWithCards),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Board not found"),
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
    Json(column_model): Json<board_columns::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Column: {column_model:?}");

    let column = ColumnApi::create(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        column_model,
    )
    .await?;

    debug!("New Column: {}", column.column.id);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), column)))
}

/// PUT rename a Column
#[utoipa::path(
    put,
    path = "/api/column/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Column to rename"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Renamed Column", body = ColumnWithCards),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Column not found"),
        (status = 405, description = "Method not allowed"),
        (status = 422, description = "Unprocessable Entity")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Rename Column {id}: {params:?}");

    let column = ColumnApi::update(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
        params.name,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), column)))
}

/// DELETE a Column together with its cards. Responds with the parent Board.
#[utoipa::path(
    delete,
    path = "/api/column/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Column to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Column", body = BoardWithAssociations),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Column not found"),
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
    debug!("DELETE Column by id: {id}");

    let board = ColumnApi::delete(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), board)))
}
