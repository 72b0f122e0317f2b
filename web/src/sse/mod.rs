//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the event stream endpoint.
//! The hub, registry and frame types live in the `sse` crate so that the
//! domain event bridge can reach them without depending on `web`.

pub mod handler;
