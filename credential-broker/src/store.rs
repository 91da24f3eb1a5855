//! Shared in-memory credential cache
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


use credbroker_types::{CredentialName, CredentialValue};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Keyed cache of live credentials
///
/// Each operation holds the lock for a single map access only. Values are
/// cloned out, so readers never hold the lock after returning and never see
/// a partially written value. Concurrent writes to the same name resolve
/// last-write-wins by completion order.
#[derive(Default)]
pub struct CredentialStore {
    credentials: RwLock<HashMap<CredentialName, CredentialValue>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `name`
    pub fn put(&self, name: CredentialName, value: CredentialValue) {
        self.credentials.write().insert(name, value);
    }

    /// Current value for `name`, or `None` if it was never stored
    pub fn get(&self, name: &CredentialName) -> Option<CredentialValue> {
        self.credentials.read().get(name).cloned()
    }

    /// Drop the value for `name`, returning it if present
    pub fn remove(&self, name: &CredentialName) -> Option<CredentialValue> {
        self.credentials.write().remove(name)
    }

    pub fn contains(&self, name: &CredentialName) -> bool {
        self.credentials.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.credentials.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.read().is_empty()
    }

    /// Sorted snapshot of the cached names
    pub fn names(&self) -> Vec<CredentialName> {
        let mut names: Vec<CredentialName> = self.credentials.read().keys().cloned().collect();
        names.sort();
        names
    }
}
