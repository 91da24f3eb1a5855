//! Credential event payload schemas
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


use serde::{Deserialize, Serialize};

use crate::credential::{CredentialName, CredentialValue};

// ============================================================================
// Inbound Payloads
// ============================================================================

/// Payload for `credential.issued` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialIssued {
    pub name: CredentialName,
    pub value: CredentialValue,
}

impl CredentialIssued {
    pub fn new(name: CredentialName, value: impl Into<CredentialValue>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Payload for `credential.requested` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequested {
    pub name: CredentialName,
}

impl CredentialRequested {
    pub fn new(name: CredentialName) -> Self {
        Self { name }
    }
}

// ============================================================================
// Outbound Payloads
// ============================================================================

/// Payload for `credential.provided` event
///
/// Only ever produced in answer to a `credential.requested` event for a
/// name the broker knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProvided {
    pub name: CredentialName,
    pub value: CredentialValue,
}

impl CredentialProvided {
    pub fn new(name: CredentialName, value: CredentialValue) -> Self {
        Self { name, value }
    }
}
