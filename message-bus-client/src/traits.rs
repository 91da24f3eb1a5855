//! Traits for message bus operations

use async_trait::async_trait;
use credbroker_types::{Event, EventType};
use futures::Stream;
use std::pin::Pin;

/// Stream of events delivered by a subscription
pub type EventStream<'a> =
    Pin<Box<dyn Stream<Item = std::result::Result<Event, crate::error::MessageBusError>> + Send + 'a>>;

/// Trait for message bus clients
#[async_trait]
pub trait MessageBusClient: Send + Sync {
    /// Publish an event to the message bus
    async fn publish(&self, event: &Event) -> Result<(), crate::error::MessageBusError>;

    /// Subscribe to events of a specific type
    /// Returns a stream of events
    fn subscribe(&self, event_type: EventType) -> EventStream<'_> {
        self.subscribe_many(&[event_type])
    }

    /// Subscribe to several event types on a single stream
    ///
    /// Events of all the given types arrive in the order they were published.
    fn subscribe_many(&self, event_types: &[EventType]) -> EventStream<'_>;

    /// Check if the client is connected
    async fn is_connected(&self) -> bool;

    /// Get the client type name
    fn client_type(&self) -> &str;
}
