//! The last step shared by every mutating operation: announce the committed
//! change on the event publisher.

use events::{DomainEvent, EventPublisher};
use log::*;
use serde::Serialize;
use serde_json::Value;

/// Serializes the re-fetched `entity` and publishes it as the event built by `into_event`.
///
/// Called only after the mutation has committed. A payload that fails to
/// serialize is logged and not published; the mutation itself still succeeded.
pub async fn publish_change<T, F>(publisher: &EventPublisher, entity: &T, into_event: F)
where
    T: Serialize,
    F: FnOnce(Value) -> DomainEvent,
{
    match serde_json::to_value(entity) {
        Ok(payload) => publisher.publish(into_event(payload)).await,
        Err(e) => error!("Failed to serialize committed change for publishing: {e}"),
    }
}

/// Rejects blank required text fields before anything is written.
pub(crate) fn require_present(field: &str, value: &str) -> Result<(), crate::error::Error> {
    if value.trim().is_empty() {
        debug!("Rejected blank {field}");
        return Err(crate::error::Error::invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use events::EventHandler;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<DomainEvent>>);

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn publishes_the_serialized_entity() {
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());

        publish_change(&publisher, &json!({"id": "c1"}), |card| {
            DomainEvent::CardUpdated { card }
        })
        .await;

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![DomainEvent::CardUpdated {
                card: json!({"id": "c1"})
            }]
        );
    }

    #[test]
    fn blank_fields_are_invalid() {
        assert!(require_present("name", "  ").is_err());
        assert!(require_present("name", "Backlog").is_ok());
    }
}
