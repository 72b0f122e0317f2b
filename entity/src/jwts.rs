use serde::Serialize;
use utoipa::ToSchema;

/// Represents a JSON Web Token (JWT) issued at login.
/// Note: This struct does not have a corresponding entity in the database.
///
/// - `token`: the signed session token to send back as `Authorization: Bearer <token>`.
/// - `sub`: the subject (user id) of the token, so clients need not decode it.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[schema(as = jwt::Jwt)] // OpenAPI schema
pub struct Jwt {
    pub token: String,
    pub sub: String,
}
