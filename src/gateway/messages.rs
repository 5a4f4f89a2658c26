//! Gateway Frames
//!
//! Raw gateway frames as they arrive on the wire, before dispatch decoding.

use serde::Deserialize;

use super::Event;

/// Gateway opcodes relevant to state. Every other opcode is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Event dispatch
    Dispatch = 0,
}

/// Incoming gateway message
///
/// `op` defaults to dispatch so bare `{"t", "d"}` records decode too.
#[derive(Debug, Deserialize)]
pub struct GatewayReceive {
    #[serde(default)]
    pub op: u8,
    pub d: Option<serde_json::Value>,
    pub s: Option<u64>,
    pub t: Option<String>,
}

impl GatewayReceive {
    pub fn is_dispatch(&self) -> bool {
        self.op == OpCode::Dispatch as u8 && self.t.is_some()
    }

    /// Decode the dispatch this frame carries.
    ///
    /// Returns `None` for frames that are not dispatches.
    pub fn into_event(self) -> Option<Result<Event, serde_json::Error>> {
        if !self.is_dispatch() {
            return None;
        }
        let name = self.t?;
        Some(Event::from_dispatch(&name, self.d.unwrap_or(serde_json::Value::Null)))
    }
}
