//! Infrastructure Layer
//!
//! Contains implementations behind the domain contracts:
//! - In-memory store (dashmap)
//! - Prometheus metrics

pub mod memory_store;
pub mod metrics;

pub use memory_store::{MemoryStore, DEFAULT_MAX_MESSAGES};
