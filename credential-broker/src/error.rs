//! Error types for the credential broker
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


use credbroker_types::CredbrokerError;
use message_bus_client::MessageBusError;
use thiserror::Error;

/// Credential broker errors
///
/// An unknown credential is not an error; lookups report it as `None`.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Broker initialization failed: {0}")]
    Initialization(String),

    #[error("Event error: {0}")]
    Event(#[from] CredbrokerError),

    #[error("Message bus error: {0}")]
    MessageBus(#[from] MessageBusError),
}

/// Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;
