use crate::{
    controller::{
        board_controller, card_controller, column_controller, health_check_controller,
        user_controller, user_session_controller,
    },
    params, sse, AppState,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Kanban Board API"
        ),
        paths(
            health_check_controller::health_check,
            user_session_controller::login,
            user_session_controller::register,
            user_session_controller::logout,
            user_controller::current,
            board_controller::index,
            board_controller::create,
            board_controller::read,
            board_controller::leave,
            column_controller::create,
            column_controller::update,
            column_controller::delete,
            card_controller::create,
            card_controller::delete,
            card_controller::join,
            card_controller::leave,
            sse::handler::event_stream,
        ),
        components(
            schemas(
                domain::board_columns::Model,
                domain::boards::Model,
                domain::cards::Model,
                domain::jwts::Jwt,
                domain::users::Model,
                domain::user::Credentials,
                domain::BoardWithAssociations,
                domain::CardWithMembers,
                domain::ColumnWithCards,
                params::board::CreateParams,
                params::column::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "kanban_board", description = "Collaborative Kanban Board API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the bearer token requirement for gaining access to our protected API
// endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_session_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(board_routes(app_state.clone()))
        .merge(column_routes(app_state.clone()))
        .merge(card_routes(app_state.clone()))
        .merge(event_stream_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/api/", get(health_check_controller::health_check))
}

fn user_session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(user_session_controller::login))
        .route("/api/register", post(user_session_controller::register))
        .route("/api/logout", post(user_session_controller::logout))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(user_controller::current))
        .with_state(app_state)
}

fn board_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/boards", get(board_controller::index))
        .route("/api/board", post(board_controller::create))
        .route("/api/boards/{id}", get(board_controller::read))
        .route("/api/boards/{id}/members", delete(board_controller::leave))
        .with_state(app_state)
}

fn column_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/column", post(column_controller::create))
        .route(
            "/api/column/{id}",
            put(column_controller::update).delete(column_controller::delete),
        )
        .with_state(app_state)
}

fn card_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/cards", post(card_controller::create))
        .route("/api/cards/{id}", delete(card_controller::delete))
        .route(
            "/api/cards/{id}/members",
            post(card_controller::join).delete(card_controller::leave),
        )
        .with_state(app_state)
}

fn event_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/event-stream", get(sse::handler::event_stream))
        .with_state(app_state)
}
