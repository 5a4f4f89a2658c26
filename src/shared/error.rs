//! State Error Types
//!
//! Store failures, the contextual diagnostic pair built from them, and the
//! per-event accumulator used while reconciling batches.

use crate::domain::Snowflake;

/// Failure reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("parent {kind} {id} not found")]
    MissingParent { kind: &'static str, id: Snowflake },

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A non-fatal diagnostic: a store failure plus what the engine was doing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{context}: {source}")]
pub struct StateError {
    pub context: &'static str,
    #[source]
    pub source: StoreError,
}

impl StateError {
    pub fn new(source: StoreError, context: &'static str) -> Self {
        Self { context, source }
    }
}

/// Ordered accumulator of diagnostics for one reconciliation call.
///
/// Sub-operations push their failures and keep going; the caller takes the
/// whole sequence back with [`ErrorStack::into_inner`]. An empty stack means
/// every sub-operation succeeded.
#[derive(Debug, Default)]
pub struct ErrorStack {
    errors: Vec<StateError>,
}

impl ErrorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure with the operation that produced it.
    pub fn push(&mut self, err: StoreError, context: &'static str) {
        self.errors.push(StateError::new(err, context));
    }

    /// Record the failure of `result`, if any.
    pub fn check<T>(&mut self, result: Result<T, StoreError>, context: &'static str) {
        if let Err(err) = result {
            self.push(err, context);
        }
    }

    /// Append diagnostics produced by a nested batch.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = StateError>) {
        self.errors.extend(errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_inner(self) -> Vec<StateError> {
        self.errors
    }
}
