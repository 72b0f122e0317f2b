use crate::controller::ApiResponse;
use crate::{AppState, Error};
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Json};
use domain::user::{self as UserApi, Credentials};
use domain::users;
use log::*;

/// Logs the user in and returns a signed session token.
///
/// Send the token back on every protected API call, e.g.:
/// curl -v --header "Authorization: Bearer <token>" --request GET http://localhost:8080/api/boards
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = domain::user::Credentials,
    responses(
        (status = 200, description = "Logs in and returns a session token", body = domain::jwts::Jwt),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST login for username: {}", credentials.username);

    let jwt = UserApi::login(app_state.db_conn_ref(), app_state.config(), credentials).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), jwt)))
}

/// Creates a new account.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = users::Model,
    responses(
        (status = 201, description = "Successfully registered a new user", body = users::Model),
        (status = 400, description = "Email or username already registered"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(user_model): Json<users::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST register username: {}", user_model.username);

    let user = UserApi::register(app_state.db_conn_ref(), user_model).await?;

    debug!("Registered user: {}", user.id);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), user)))
}

/// Session tokens are stateless, so logging out only tells the client to
/// discard its token.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Successfully logged out"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn logout() -> impl IntoResponse {
    trace!("UserSessionController::logout()");
    Json(ApiResponse::<()>::with_message(
        StatusCode::OK.into(),
        "logged out",
    ))
}
