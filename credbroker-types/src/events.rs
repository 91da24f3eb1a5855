//! Event type definitions for the message bus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::credential::CredentialName;
use crate::error::{CredbrokerError, Result};
use crate::schemas::*;

/// Event type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "credential.issued")]
    CredentialIssued,
    #[serde(rename = "credential.requested")]
    CredentialRequested,
    #[serde(rename = "credential.provided")]
    CredentialProvided,
}

impl EventType {
    /// Dotted wire name, e.g. `credential.issued`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::CredentialIssued => "credential.issued",
            EventType::CredentialRequested => "credential.requested",
            EventType::CredentialProvided => "credential.provided",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base event structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event type identifier
    pub event_type: EventType,

    /// Unique event identifier
    pub event_id: Uuid,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,

    /// Source service that published the event
    pub source: String,

    /// Id of the event this one answers, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,

    /// Event payload (type depends on event_type)
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event
    pub fn new(
        event_type: EventType,
        source: impl Into<String>,
        payload: impl Serialize,
    ) -> Result<Self> {
        let payload_value = serde_json::to_value(payload)?;

        Ok(Self {
            event_type,
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            correlation_id: None,
            payload: payload_value,
        })
    }

    /// Mark this event as the answer to another event
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Deserialize the payload into a specific type
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| CredbrokerError::InvalidPayload(e.to_string()))
    }
}

/// Inbound events the broker reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialEvent {
    Issued(CredentialIssued),
    Requested(CredentialRequested),
}

impl CredentialEvent {
    /// Name of the credential the event refers to
    pub fn name(&self) -> &CredentialName {
        match self {
            CredentialEvent::Issued(issued) => &issued.name,
            CredentialEvent::Requested(requested) => &requested.name,
        }
    }
}

impl From<CredentialIssued> for CredentialEvent {
    fn from(event: CredentialIssued) -> Self {
        CredentialEvent::Issued(event)
    }
}

impl From<CredentialRequested> for CredentialEvent {
    fn from(event: CredentialRequested) -> Self {
        CredentialEvent::Requested(event)
    }
}

impl TryFrom<&Event> for CredentialEvent {
    type Error = CredbrokerError;

    fn try_from(event: &Event) -> Result<Self> {
        match event.event_type {
            EventType::CredentialIssued => Ok(CredentialEvent::Issued(event.payload_as()?)),
            EventType::CredentialRequested => Ok(CredentialEvent::Requested(event.payload_as()?)),
            EventType::CredentialProvided => Err(CredbrokerError::InvalidEventType(format!(
                "{} is outbound only",
                event.event_type
            ))),
        }
    }
}
