//! Server-Sent Events (SSE) infrastructure for real-time board updates.
//!
//! # Architecture
//!
//! - **Broadcast scope**: every connected client receives every event. Clients
//!   filter by the board they have open.
//! - **Bounded per-subscriber queues**: a subscriber that falls behind loses
//!   frames; it never slows down a publisher or another subscriber.
//! - **Ephemeral messages**: a client that is not connected misses the event
//!   and sees fresh data on its next load.
//! - **Single removal path**: stream drop, explicit unsubscribe, closed queue
//!   detection and shutdown all unregister through `ConnectionRegistry`.
//!
//! # Message Flow
//!
//! 1. A client opens `/api/event-stream`; the handler calls `Hub::subscribe`
//! 2. A mutation commits in the domain layer and is re-read
//! 3. The domain publishes a `DomainEvent`; `SseDomainEventHandler` passes it to `Hub::publish`
//! 4. The hub serializes once and `try_send`s the frame to each queue
//! 5. Each stream's writer loop forwards its frames to the client
//!
//! # Modules
//!
//! - `connection`: `ConnectionRegistry` and `ConnectionId`
//! - `hub`: `Hub` and `Subscription`
//! - `message`: `EventType`, `Frame`, `Delivery`
//! - `domain_event_handler`: bridge from `events` to the hub

pub mod connection;
pub mod domain_event_handler;
pub mod hub;
pub mod message;

pub use connection::ConnectionId;
pub use domain_event_handler::SseDomainEventHandler;
pub use hub::{Hub, Subscription};
pub use message::{Delivery, EventType, Frame};
