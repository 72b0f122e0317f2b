use log::*;
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger};
use sse::{Hub, SseDomainEventHandler};
use std::sync::Arc;

use events::EventPublisher;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting up Kanban Board API in {} mode", config.runtime_env());

    if config.jwt_secret().is_none() {
        warn!("No JWT secret configured, login and all protected routes will fail");
    }

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    // One hub for the whole process. Mutations reach it only through the
    // publisher, streaming connections only through the hub.
    let event_hub = Hub::with_capacity(config.sse_queue_capacity);
    let event_publisher = EventPublisher::new()
        .with_handler(Arc::new(SseDomainEventHandler::new(event_hub.clone())));

    info!(
        "Event hub ready, per-connection queue capacity {}",
        config.sse_queue_capacity
    );

    let service_state = service::AppState::new(config, &db);
    let app_state = web::AppState::new(service_state, event_hub, event_publisher);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server terminated with an error: {e}");
        std::process::exit(1);
    }

    info!("Server shut down cleanly");
}
