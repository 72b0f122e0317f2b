use crate::connection::{ConnectionId, ConnectionRegistry};
use crate::message::{Delivery, EventType, Frame};
use log::*;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver};

/// Fans frames out to every connected subscriber.
///
/// Cloning a `Hub` is cheap and every clone shares the same registry.
#[derive(Clone)]
pub struct Hub {
    registry: Arc<ConnectionRegistry>,
    capacity: usize,
}

impl Hub {
    /// Creates a hub whose subscribers may each fall `capacity` frames behind
    /// before further frames are dropped for them.
    pub fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            warn!("SSE queue capacity of 0 is not usable, using 1");
        }

        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            capacity: capacity.max(1),
        }
    }

    /// Registers a new session. Dropping the returned handle unsubscribes it.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = self.registry.register(sender);
        info!(
            "Registered SSE connection {id} ({} open)",
            self.registry.len()
        );

        Subscription {
            id,
            receiver,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Removes a session and releases its queue. Only the first call for a
    /// given id returns `true`.
    pub fn unsubscribe(&self, id: &ConnectionId) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            info!("Unsubscribed SSE connection {id}");
        }
        removed
    }

    /// Serializes `payload` once and queues it for every subscriber without waiting.
    ///
    /// A subscriber with a full queue misses this frame. A subscriber whose
    /// queue is closed is unregistered.
    pub fn publish<T>(&self, event_type: EventType, payload: &T) -> Delivery
    where
        T: Serialize + ?Sized,
    {
        let data = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {event_type} payload: {e}");
                return Delivery::default();
            }
        };

        let frame = Frame::new(event_type, data);
        let mut delivery = Delivery::default();

        for (id, sender) in self.registry.snapshot() {
            match sender.try_send(frame.clone()) {
                Ok(()) => delivery.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("SSE connection {id} is not keeping up, dropping {event_type}");
                    delivery.dropped += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    self.registry.unregister(&id);
                    delivery.closed += 1;
                }
            }
        }

        debug!(
            "Published {event_type}: delivered={}, dropped={}, closed={}",
            delivery.delivered, delivery.dropped, delivery.closed
        );

        delivery
    }

    /// Ends every open stream. Used on shutdown.
    pub fn close_all(&self) {
        let closed = self.registry.clear();
        info!("Closed {closed} SSE connection(s)");
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_subscribed(&self, id: &ConnectionId) -> bool {
        self.registry.contains(id)
    }
}

/// A registered session's receiving end.
pub struct Subscription {
    id: ConnectionId,
    receiver: Receiver<Frame>,
    registry: Arc<ConnectionRegistry>,
}

impl Subscription {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Waits for the next frame. Returns `None` once the session has been
    /// unsubscribed and its queue drained.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.registry.unregister(&self.id) {
            info!("SSE connection {} closed by client", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn publish_with_no_subscribers_is_a_no_op() {
        let hub = Hub::with_capacity(4);
        let delivery = hub.publish(EventType::BoardUpdate, &json!({"id": "b1"}));
        assert_eq!(delivery, Delivery::default());
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_same_frame() {
        let hub = Hub::with_capacity(4);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        let delivery = hub.publish(EventType::CardUpdate, &json!({"id": "c1"}));
        assert_eq!(delivery.delivered, 2);

        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(a.event_name(), "card_update");
        assert_eq!(a.data(), r#"{"id":"c1"}"#);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn frames_arrive_in_publish_order() {
        let hub = Hub::with_capacity(8);
        let mut sub = hub.subscribe();

        hub.publish(EventType::ColumnUpdate, &json!(1));
        hub.publish(EventType::CardDeleted, &json!(2));

        assert_eq!(sub.recv().await.unwrap().data(), "1");
        assert_eq!(sub.recv().await.unwrap().data(), "2");
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let hub = Hub::with_capacity(4);
        let sub = hub.subscribe();
        let id = sub.id().clone();

        assert!(hub.is_subscribed(&id));
        assert!(hub.unsubscribe(&id));
        assert!(!hub.unsubscribe(&id));
        assert!(!hub.is_subscribed(&id));

        drop(sub);
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn dropping_the_subscription_unsubscribes() {
        let hub = Hub::with_capacity(4);
        let sub = hub.subscribe();
        let id = sub.id().clone();

        drop(sub);

        assert!(!hub.is_subscribed(&id));
        assert!(!hub.unsubscribe(&id));
    }

    #[tokio::test]
    async fn unsubscribed_session_sees_no_later_frames() {
        let hub = Hub::with_capacity(4);
        let mut leaving = hub.subscribe();
        let mut staying = hub.subscribe();

        hub.unsubscribe(&leaving.id().clone());
        let delivery = hub.publish(EventType::BoardUpdate, &json!({"id": "b1"}));

        assert_eq!(delivery.delivered, 1);
        assert!(leaving.recv().await.is_none());
        assert!(staying.recv().await.is_some());
    }

    #[tokio::test]
    async fn late_subscriber_does_not_see_earlier_frames() {
        let hub = Hub::with_capacity(4);
        let mut early = hub.subscribe();

        let delivery = hub.publish(EventType::CardUpdate, &json!({"id": "c1"}));
        assert_eq!(delivery.delivered, 1);

        let mut late = hub.subscribe();

        assert_eq!(early.recv().await.unwrap().data(), r#"{"id":"c1"}"#);
        assert!(
            timeout(Duration::from_millis(50), late.recv()).await.is_err(),
            "a session opened after publish returned must receive nothing"
        );

        hub.publish(EventType::CardUpdate, &json!({"id": "c2"}));
        assert_eq!(late.recv().await.unwrap().data(), r#"{"id":"c2"}"#);
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking_other_subscribers() {
        let hub = Hub::with_capacity(1);
        let _stalled = hub.subscribe();
        let mut healthy = hub.subscribe();

        for n in 0..3 {
            let delivery = timeout(Duration::from_millis(100), async {
                hub.publish(EventType::CardUpdate, &json!(n))
            })
            .await
            .expect("publish must not block on a stalled subscriber");

            if n > 0 {
                assert_eq!(delivery.dropped, 1);
            }
            assert_eq!(healthy.recv().await.unwrap().data(), n.to_string());
        }

        assert_eq!(hub.connection_count(), 2);
    }

    #[tokio::test]
    async fn closed_queue_is_unregistered_on_publish() {
        let hub = Hub::with_capacity(4);
        let mut sub = hub.subscribe();
        let id = sub.id().clone();
        sub.receiver.close();

        let delivery = hub.publish(EventType::CardDeleted, &json!({}));

        assert_eq!(delivery.closed, 1);
        assert!(!hub.is_subscribed(&id));
    }

    #[tokio::test]
    async fn close_all_ends_every_stream() {
        let hub = Hub::with_capacity(4);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.close_all();

        assert_eq!(hub.connection_count(), 0);
        assert!(first.recv().await.is_none());
        assert!(second.recv().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_unsubscribes_remove_the_session_once() {
        let hub = Hub::with_capacity(4);
        let sub = hub.subscribe();
        let id = sub.id().clone();

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let hub = hub.clone();
                let id = id.clone();
                tokio::spawn(async move { hub.unsubscribe(&id) })
            })
            .collect();

        let mut removed = 0;
        for attempt in attempts {
            if attempt.await.unwrap() {
                removed += 1;
            }
        }
        drop(sub);

        assert_eq!(removed, 1);
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_publishers_and_subscribers_do_not_deadlock() {
        let hub = Hub::with_capacity(16);

        let publishers: Vec<_> = (0..4)
            .map(|n| {
                let hub = hub.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        hub.publish(EventType::BoardUpdate, &json!(n));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        let churners: Vec<_> = (0..4)
            .map(|_| {
                let hub = hub.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        let sub = hub.subscribe();
                        tokio::task::yield_now().await;
                        drop(sub);
                    }
                })
            })
            .collect();

        timeout(Duration::from_secs(5), async {
            for task in publishers.into_iter().chain(churners) {
                task.await.unwrap();
            }
        })
        .await
        .expect("hub operations must not deadlock");

        assert_eq!(hub.connection_count(), 0);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let hub = Hub::with_capacity(0);
        assert_eq!(hub.capacity, 1);
    }
}
