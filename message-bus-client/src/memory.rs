//! In-process message bus
//!
//! Delivers events between publishers and subscribers living in the same
//! process. Used by tests and by the `memory://` bus URL.
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use async_trait::async_trait;
use credbroker_types::{Event, EventType};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::{EventStream, MessageBusClient};

const DEFAULT_CAPACITY: usize = 1000;

/// Broadcast-backed in-memory message bus
///
/// Subscribers only see events published after they subscribed.
#[derive(Clone)]
pub struct InMemoryBus {
    tx: broadcast::Sender<Event>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus buffering at most `capacity` undelivered events per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity.max(1)).0,
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBusClient for InMemoryBus {
    async fn publish(&self, event: &Event) -> Result<()> {
        // No subscribers is not an error, the event is simply dropped
        let delivered = self.tx.send(event.clone()).unwrap_or(0);

        debug!(
            event_type = %event.event_type,
            event_id = %event.event_id,
            subscribers = delivered,
            "Event published"
        );

        Ok(())
    }

    fn subscribe_many(&self, event_types: &[EventType]) -> EventStream<'_> {
        // Subscribe before spawning so nothing published after this call is missed
        let mut rx = self.tx.subscribe();
        let (tx, out) = tokio::sync::mpsc::channel(100);
        let wanted = event_types.to_vec();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Stream dropped: release the broadcast receiver right away
                    _ = tx.closed() => break,
                    received = rx.recv() => match received {
                        Ok(event) if wanted.contains(&event.event_type) => {
                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(
                                event_types = ?wanted,
                                skipped = skipped,
                                "Subscriber lagged, events dropped"
                            );
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        Box::pin(ReceiverStream::new(out))
    }

    async fn is_connected(&self) -> bool {
        true
    }

    fn client_type(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credbroker_types::{CredentialIssued, CredentialName, CredentialRequested};
    use tokio_stream::StreamExt;

    fn requested(name: &str) -> Event {
        let payload = CredentialRequested::new(CredentialName::new(name).unwrap());
        Event::new(EventType::CredentialRequested, "test", payload).unwrap()
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = InMemoryBus::new();
        tokio_test::assert_ok!(bus.publish(&requested("api-key")).await);
    }

    #[tokio::test]
    async fn test_subscriber_receives_only_its_event_type() {
        let bus = InMemoryBus::new();
        let mut stream = bus.subscribe(EventType::CredentialRequested);

        let issued = CredentialIssued::new(CredentialName::new("db-password").unwrap(), "s3cr3t");
        bus.publish(&Event::new(EventType::CredentialIssued, "test", issued).unwrap())
            .await
            .unwrap();
        let request = requested("db-password");
        bus.publish(&request).await.unwrap();

        let received = stream.next().await.unwrap().unwrap();
        assert_eq!(received.event_id, request.event_id);
        assert_eq!(received.event_type, EventType::CredentialRequested);
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_a_copy() {
        let bus = InMemoryBus::new();
        let mut first = bus.subscribe(EventType::CredentialRequested);
        let mut second = bus.subscribe(EventType::CredentialRequested);
        assert_eq!(bus.subscriber_count(), 2);

        let request = requested("api-key");
        bus.publish(&request).await.unwrap();

        assert_eq!(first.next().await.unwrap().unwrap().event_id, request.event_id);
        assert_eq!(second.next().await.unwrap().unwrap().event_id, request.event_id);
    }

    #[tokio::test]
    async fn test_subscribe_many_keeps_publish_order_across_types() {
        let bus = InMemoryBus::new();
        let mut stream =
            bus.subscribe_many(&[EventType::CredentialIssued, EventType::CredentialRequested]);

        let mut published = Vec::new();
        for i in 0..50 {
            let n = CredentialName::new(format!("cred-{}", i)).unwrap();
            let issued = Event::new(
                EventType::CredentialIssued,
                "test",
                CredentialIssued::new(n, "v"),
            )
            .unwrap();
            let request = requested(&format!("cred-{}", i));
            bus.publish(&issued).await.unwrap();
            bus.publish(&request).await.unwrap();
            published.push(issued.event_id);
            published.push(request.event_id);
        }

        for expected in published {
            assert_eq!(stream.next().await.unwrap().unwrap().event_id, expected);
        }
    }

    #[tokio::test]
    async fn test_dropped_stream_releases_subscription() {
        let bus = InMemoryBus::new();
        let stream = bus.subscribe(EventType::CredentialRequested);
        assert_eq!(bus.subscriber_count(), 1);

        drop(stream);

        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while bus.subscriber_count() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("subscription still held after stream was dropped");
    }

    #[tokio::test]
    async fn test_client_metadata() {
        let bus = InMemoryBus::default();
        assert!(bus.is_connected().await);
        assert_eq!(bus.client_type(), "memory");
    }
}
