use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::users;
use log::*;

/// GET the currently authenticated user
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Successfully retrieved the current user", body = users::Model),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn current(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    debug!("GET current user: {}", user.id);

    Json(ApiResponse::new(StatusCode::OK.into(), user))
}
