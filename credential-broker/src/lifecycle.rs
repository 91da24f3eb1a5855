//! Init-once ownership of the process broker
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


use once_cell::sync::OnceCell;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info};

use crate::broker::CredentialBroker;
use crate::error::{BrokerError, BrokerResult};

/// Slot holding the single broker of a process
///
/// Created by the composition root and handed to whatever wires the broker
/// to the message bus. Concurrent first use runs the initializer exactly
/// once; every caller gets the same instance. There is no reset.
pub struct BrokerCell {
    broker: OnceCell<Arc<CredentialBroker>>,
}

impl BrokerCell {
    pub const fn new() -> Self {
        Self {
            broker: OnceCell::new(),
        }
    }

    /// The live broker, if one has been initialized
    pub fn get(&self) -> Option<Arc<CredentialBroker>> {
        self.broker.get().cloned()
    }

    /// Get the broker, creating one with an empty store on first use
    pub fn get_or_init(&self) -> Arc<CredentialBroker> {
        self.broker
            .get_or_init(|| {
                info!("Credential broker initialized");
                Arc::new(CredentialBroker::new())
            })
            .clone()
    }

    /// Get the broker, running `init` on first use
    ///
    /// A failing `init` is reported as [`BrokerError::Initialization`] and
    /// leaves the cell empty; it is not retried here.
    pub fn get_or_try_init<F, E>(&self, init: F) -> BrokerResult<Arc<CredentialBroker>>
    where
        F: FnOnce() -> Result<CredentialBroker, E>,
        E: Display,
    {
        self.broker
            .get_or_try_init(|| match init() {
                Ok(broker) => {
                    info!("Credential broker initialized");
                    Ok(Arc::new(broker))
                }
                Err(e) => {
                    error!(error = %e, "Credential broker initialization failed");
                    Err(BrokerError::Initialization(e.to_string()))
                }
            })
            .cloned()
    }
}

impl Default for BrokerCell {
    fn default() -> Self {
        Self::new()
    }
}
