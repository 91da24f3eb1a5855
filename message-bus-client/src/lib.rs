//! Message Bus Client Library
//!
//! Provides a unified interface for publishing and consuming credential
//! events, backed either by NATS JetStream or by an in-process bus.

pub mod nats;
pub mod memory;
pub mod error;
pub mod traits;

pub use error::*;
pub use traits::*;
pub use nats::*;
pub use memory::*;
