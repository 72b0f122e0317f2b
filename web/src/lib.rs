use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use events::EventPublisher;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::io;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;

pub use self::error::{Error, Result};

mod controller;
mod error;
mod extractors;
mod params;
pub mod router;
mod sse;

/// Shared state for every request handler.
///
/// Wraps the infrastructure-only `service::AppState` and adds the event hub
/// that streaming connections subscribe to, plus the publisher mutations
/// announce their changes through.
#[derive(Clone)]
pub struct AppState {
    pub service_state: service::AppState,
    pub event_hub: ::sse::Hub,
    pub event_publisher: EventPublisher,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        event_hub: ::sse::Hub,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            service_state,
            event_hub,
            event_publisher,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }
}

pub async fn init_server(app_state: AppState) -> io::Result<()> {
    let config = app_state.config().clone();
    let event_hub = app_state.event_hub.clone();

    let interface = config.interface.as_deref().unwrap_or("127.0.0.1");
    let listen_addr = format!("{interface}:{}", config.port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = TcpListener::bind(&listen_addr).await?;

    let app = router::define_routes(app_state).layer(cors_layer(&config));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(event_hub))
        .await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    info!("CORS allowed origins: {:?}", config.allowed_origins);

    CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(origins)
}

// Resolves on SIGINT or SIGTERM. Open event streams are closed from the hub
// side so that in-flight SSE responses finish and shutdown can complete.
async fn shutdown_signal(event_hub: ::sse::Hub) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }

    info!(
        "Closing {} event stream connection(s)",
        event_hub.connection_count()
    );
    event_hub.close_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cors_layer_skips_unparseable_origins() {
        let config = Config::parse_from([
            "kanban_board_rs",
            "--allowed-origins",
            "http://localhost:3000,bad\norigin",
        ]);
        // Building the layer must not panic on the invalid entry.
        let _layer = cors_layer(&config);
    }
}
