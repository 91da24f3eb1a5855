//! Error types for credential broker types
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


use thiserror::Error;

/// Errors that can occur while building or decoding credential events
#[derive(Error, Debug)]
pub enum CredbrokerError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid event type: {0}")]
    InvalidEventType(String),

    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid credential name: {0}")]
    InvalidCredentialName(String),
}

pub type Result<T> = std::result::Result<T, CredbrokerError>;
