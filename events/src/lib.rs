//! Event system infrastructure for the kanban backend.
//!
//! This crate lets the mutation gateway announce committed changes without
//! knowing who listens. The SSE hub is one such listener.
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing every change clients are told about
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Changes announced after a mutation has committed.
///
/// Each payload is the freshly re-read entity in the same JSON shape the REST
/// endpoints return, so clients can replace their local copy wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// A card was created, or its member set changed.
    CardUpdated { card: Value },
    /// A card was removed. Carries the card as it was just before deletion.
    CardDeleted { card: Value },
    /// A column was created or renamed. Carries the column with its cards.
    ColumnUpdated { column: Value },
    /// A board was created, its member set changed, or one of its columns was removed.
    BoardUpdated { board: Value },
}

impl DomainEvent {
    /// The serialized entity this event carries.
    pub fn payload(&self) -> &Value {
        match self {
            DomainEvent::CardUpdated { card } | DomainEvent::CardDeleted { card } => card,
            DomainEvent::ColumnUpdated { column } => column,
            DomainEvent::BoardUpdated { board } => board,
        }
    }
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers must not block: they run on the request path of the mutation
    /// that produced the event.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        tag: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, DomainEvent)>>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().await.push((self.tag, event.clone()));
        }
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        let publisher = EventPublisher::default();
        publisher
            .publish(DomainEvent::BoardUpdated { board: json!({}) })
            .await;
        assert_eq!(publisher.handler_count(), 0);
    }

    #[tokio::test]
    async fn handlers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(Recorder {
                tag: "first",
                seen: seen.clone(),
            }))
            .with_handler(Arc::new(Recorder {
                tag: "second",
                seen: seen.clone(),
            }));

        let event = DomainEvent::CardDeleted {
            card: json!({"id": "c1", "title": "gone"}),
        };
        publisher.publish(event.clone()).await;

        let seen = seen.lock().await;
        assert_eq!(*seen, vec![("first", event.clone()), ("second", event)]);
    }

    #[tokio::test]
    async fn with_handler_leaves_earlier_clones_untouched() {
        let base = EventPublisher::new();
        let extended = base.clone().with_handler(Arc::new(Recorder::default()));

        assert_eq!(base.handler_count(), 0);
        assert_eq!(extended.handler_count(), 1);
    }

    #[test]
    fn payload_returns_the_carried_entity() {
        let column = json!({"id": "col", "cards": []});
        let event = DomainEvent::ColumnUpdated {
            column: column.clone(),
        };
        assert_eq!(event.payload(), &column);
    }
}
