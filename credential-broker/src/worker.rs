//! Credential Broker Worker - Event Processing
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


use credbroker_types::{CredentialEvent, Event, EventType};
use message_bus_client::traits::MessageBusClient;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::broker::CredentialBroker;
use crate::error::BrokerResult;

/// Source name stamped on published events
pub const EVENT_SOURCE: &str = "credential-broker";

/// Connects a [`CredentialBroker`] to the message bus
pub struct BrokerWorker {
    message_bus: Arc<dyn MessageBusClient>,
    broker: Arc<CredentialBroker>,
}

impl BrokerWorker {
    /// Create a new broker worker
    pub fn new(message_bus: Arc<dyn MessageBusClient>, broker: Arc<CredentialBroker>) -> Self {
        Self {
            message_bus,
            broker,
        }
    }

    /// Run the worker - consume events and process them
    pub async fn run(&self) -> BrokerResult<()> {
        info!(
            client = self.message_bus.client_type(),
            "Subscribing to credential.issued and credential.requested events"
        );

        // One subscription for both kinds keeps an issuance ahead of a later request
        let mut event_stream = self
            .message_bus
            .subscribe_many(&[EventType::CredentialIssued, EventType::CredentialRequested]);

        info!("Waiting for credential events...");

        while let Some(event_result) = event_stream.next().await {
            match event_result {
                Ok(event) => {
                    if let Err(e) = self.handle_event(&event).await {
                        error!(
                            event_id = %event.event_id,
                            event_type = %event.event_type,
                            error = %e,
                            "Failed to process credential event"
                        );
                    }
                }
                Err(e) => {
                    error!(error = %e, "Error receiving event from message bus");
                    // Keep consuming; one bad message must not stop the broker
                }
            }
        }

        warn!("Event stream ended");
        Ok(())
    }

    /// Process a single inbound event
    ///
    /// Returns the published `credential.provided` event, if any.
    pub async fn handle_event(&self, event: &Event) -> BrokerResult<Option<Event>> {
        let inbound = CredentialEvent::try_from(event)?;

        debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            credential = %inbound.name(),
            "Received credential event"
        );

        let Some(provided) = self.broker.on_event(inbound) else {
            return Ok(None);
        };

        let response = Event::new(EventType::CredentialProvided, EVENT_SOURCE, &provided)?
            .with_correlation_id(event.event_id);

        self.message_bus.publish(&response).await?;

        info!(
            credential = %provided.name,
            request_id = %event.event_id,
            event_id = %response.event_id,
            "Credential provided"
        );

        Ok(Some(response))
    }
}
