use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET whether the API router is up
#[utoipa::path(
    get,
    path = "/api/",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "api is up!")
}
