//! Device side of the telemetry publish capability
//!
//! The hub itself is an external collaborator; this module only implements
//! the client: a length-prefixed wire format, an auth handshake at connect
//! time, and fire-and-forget telemetry writes.

pub mod client;
pub mod wire;

pub use client::{HubClient, Publisher};
