//! Credential Broker Types
//!
//! Shared type definitions for credential events, payload schemas and the
//! opaque credential name/value pair used across the broker services.

pub mod credential;
pub mod events;
pub mod schemas;
pub mod error;

pub use credential::*;
pub use events::*;
pub use schemas::*;
pub use error::*;
