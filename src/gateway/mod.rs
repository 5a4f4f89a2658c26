//! Gateway Event Types
//!
//! Typed dispatch payloads handed to the state engine by the session layer,
//! and the raw frames they are decoded from.

pub mod events;
pub mod messages;

pub use events::*;
pub use messages::{GatewayReceive, OpCode};
