//! Diagnostic Sink
//!
//! Where non-fatal state errors go. The default sink logs them.

use crate::shared::error::StateError;

/// Receives every diagnostic produced while applying an event.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, event: &str, error: &StateError);
}

/// Logs diagnostics as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, event: &str, error: &StateError) {
        tracing::warn!(event = %event, error = %error, "state error");
    }
}
