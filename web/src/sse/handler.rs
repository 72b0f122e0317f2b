use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use log::*;
use std::convert::Infallible;

/// Opens a long-lived event stream. Every board, column and card change made
/// through the API is pushed to every open stream until the client
/// disconnects or the server shuts down.
#[utoipa::path(
    get,
    path = "/api/event-stream",
    responses(
        (status = 200, description = "Server-Sent Events stream of card_update, card_deleted, column_update and board_update events", content_type = "text/event-stream"),
    )
)]
pub(crate) async fn event_stream(State(app_state): State<AppState>) -> impl IntoResponse {
    let mut subscription = app_state.event_hub.subscribe();
    debug!("Establishing SSE connection {}", subscription.id());

    // The subscription moves into the stream. Axum drops the stream when the
    // client goes away, which drops the subscription and unregisters it.
    let stream = stream! {
        while let Some(frame) = subscription.recv().await {
            let event = Event::default().event(frame.event_name()).data(frame.data());
            yield Ok::<Event, Infallible>(event);
        }

        debug!("SSE connection {} closed by the hub", subscription.id());
    };

    // Sse sets Content-Type and Cache-Control itself
    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}
