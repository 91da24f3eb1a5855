//! NATS JetStream implementation of the message bus client
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


use async_nats::connection::State;
use async_nats::jetstream::{self, Context};
use async_trait::async_trait;
use credbroker_types::{Event, EventType};
use std::sync::Arc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tracing::{error, info, warn};

use crate::error::{MessageBusError, Result};
use crate::traits::{EventStream, MessageBusClient};

const DEFAULT_STREAM_NAME: &str = "credbroker-events";
const DEFAULT_SUBJECT_PREFIX: &str = "credbroker";

/// Subject an event type is published on, e.g. `credbroker.credential_issued`
pub fn subject_for_event_type(subject_prefix: &str, event_type: EventType) -> String {
    format!("{}.{}", subject_prefix, event_type.as_str().replace('.', "_"))
}

/// Subject covering a set of event types
///
/// A single type maps to its own subject; several types share the
/// `<prefix>.*` wildcard so one subscriber sees them in publish order.
pub fn subject_for_event_types(subject_prefix: &str, event_types: &[EventType]) -> String {
    match event_types {
        [event_type] => subject_for_event_type(subject_prefix, *event_type),
        _ => format!("{}.*", subject_prefix),
    }
}

/// NATS JetStream message bus client
pub struct NatsClient {
    client: Arc<async_nats::Client>,
    jetstream: Arc<Context>,
    subject_prefix: String,
}

impl NatsClient {
    /// Create a new NATS client
    pub async fn new(
        url: &str,
        stream_name: Option<String>,
        subject_prefix: Option<String>,
    ) -> Result<Self> {
        info!(url = url, "Connecting to NATS server");

        let client = async_nats::connect(url)
            .await
            .map_err(|e| MessageBusError::Connection(e.to_string()))?;

        let client_arc = Arc::new(client.clone());
        let jetstream = jetstream::new(client);

        let stream_name = stream_name.unwrap_or_else(|| DEFAULT_STREAM_NAME.to_string());
        let subject_prefix = subject_prefix.unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string());

        if let Err(e) = Self::ensure_stream(&jetstream, &stream_name, &subject_prefix).await {
            warn!(stream = stream_name, error = %e, "Continuing without JetStream stream");
        }

        info!(
            stream = stream_name,
            subject_prefix = subject_prefix,
            "NATS client initialized"
        );

        Ok(Self {
            client: client_arc,
            jetstream: Arc::new(jetstream),
            subject_prefix,
        })
    }

    /// Ensure the JetStream stream exists
    ///
    /// Credentials are short-lived on the bus, so the stream keeps messages
    /// in memory only.
    async fn ensure_stream(
        jetstream: &Context,
        stream_name: &str,
        subject_prefix: &str,
    ) -> Result<()> {
        jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: stream_name.to_string(),
                subjects: vec![format!("{}.>", subject_prefix)],
                max_age: std::time::Duration::from_secs(60),
                storage: jetstream::stream::StorageType::Memory,
                ..Default::default()
            })
            .await
            .map_err(|e| MessageBusError::Connection(format!("Failed to create stream: {}", e)))?;

        info!(
            stream = stream_name,
            "Stream ensured"
        );

        Ok(())
    }
}

#[async_trait]
impl MessageBusClient for NatsClient {
    async fn publish(&self, event: &Event) -> Result<()> {
        let subject = subject_for_event_type(&self.subject_prefix, event.event_type);

        let payload = serde_json::to_vec(event)
            .map_err(MessageBusError::Serialization)?;

        self.jetstream
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| MessageBusError::Publish(e.to_string()))?;

        info!(
            event_type = %event.event_type,
            event_id = %event.event_id,
            subject = subject,
            "Event published"
        );

        Ok(())
    }

    fn subscribe_many(&self, event_types: &[EventType]) -> EventStream<'_> {
        let subject = subject_for_event_types(&self.subject_prefix, event_types);
        let wanted = event_types.to_vec();

        info!(
            subject = subject,
            event_types = ?wanted,
            "Subscribing to events"
        );

        let (tx, rx) = tokio::sync::mpsc::channel::<Result<Event>>(100);
        let client = Arc::clone(&self.client);

        tokio::spawn(async move {
            match client.subscribe(subject.clone()).await {
                Ok(mut subscriber) => {
                    info!(
                        subject = subject,
                        "Subscription created, waiting for messages"
                    );

                    while let Some(nats_msg) = subscriber.next().await {
                        let item = match serde_json::from_slice::<Event>(&nats_msg.payload) {
                            Ok(event) if wanted.contains(&event.event_type) => Ok(event),
                            Ok(_) => continue,
                            Err(e) => {
                                error!(error = %e, "Failed to deserialize event");
                                Err(MessageBusError::Serialization(e))
                            }
                        };

                        if tx.send(item).await.is_err() {
                            error!("Receiver dropped, stopping subscription");
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to create subscription");
                    let _ = tx.send(Err(MessageBusError::Subscribe(e.to_string()))).await;
                }
            }
        });

        Box::pin(ReceiverStream::new(rx))
    }

    async fn is_connected(&self) -> bool {
        self.client.connection_state() == State::Connected
    }

    fn client_type(&self) -> &str {
        "nats"
    }
}
