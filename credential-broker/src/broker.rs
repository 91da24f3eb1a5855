//! Event-reacting facade over the credential store
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


use credbroker_types::{
    CredentialEvent, CredentialIssued, CredentialProvided, CredentialRequested,
};
use tracing::{debug, info};

use crate::store::CredentialStore;

/// Translates inbound credential events into store operations
pub struct CredentialBroker {
    store: CredentialStore,
}

impl CredentialBroker {
    /// Create a broker with an empty store
    pub fn new() -> Self {
        Self::with_store(CredentialStore::new())
    }

    /// Create a broker over an existing store
    pub fn with_store(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Dispatch an inbound event to its handler
    pub fn on_event(&self, event: CredentialEvent) -> Option<CredentialProvided> {
        match event {
            CredentialEvent::Issued(issued) => {
                self.on_credential_issued(issued);
                None
            }
            CredentialEvent::Requested(requested) => self.on_credential_requested(&requested),
        }
    }

    /// Cache an issued credential, replacing any previous value
    pub fn on_credential_issued(&self, event: CredentialIssued) {
        info!(credential = %event.name, "Received credential.issued");

        self.store.put(event.name, event.value);
    }

    /// Answer a request from the cache
    ///
    /// Read-only: answering never changes what is cached.
    pub fn on_credential_requested(&self, event: &CredentialRequested) -> Option<CredentialProvided> {
        info!(credential = %event.name, "Received credential.requested");

        match self.store.get(&event.name) {
            Some(value) => Some(CredentialProvided::new(event.name.clone(), value)),
            None => {
                debug!(credential = %event.name, "Credential not available");
                None
            }
        }
    }
}

impl Default for CredentialBroker {
    fn default() -> Self {
        Self::new()
    }
}
