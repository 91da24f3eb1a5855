//! Credential Broker Library
//!
//! In-memory, event-driven credential cache:
//! - `credential.issued` events populate the cache
//! - `credential.requested` events are answered with `credential.provided`
//!   when the credential is known, and ignored otherwise
//!
//! Secrets are never written to disk and never leave the process except as
//! the payload of a `credential.provided` answer.
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


pub mod broker;
pub mod error;
pub mod lifecycle;
pub mod store;
pub mod worker;

pub use broker::CredentialBroker;
pub use error::{BrokerError, BrokerResult};
pub use lifecycle::BrokerCell;
pub use store::CredentialStore;
pub use worker::BrokerWorker;
