//! # Chat State Library
//!
//! This crate keeps a local cache of a chat gateway's entities consistent
//! with the stream of dispatch events:
//! - Typed gateway events and frames
//! - A store contract with an in-memory implementation
//! - A reconciler that maps every event onto store writes
//! - Pre/post hooks and guild lifecycle notifications
//!
//! ## Architecture
//!
//! - **Domain Layer**: Cached entities and the store traits
//! - **Gateway Layer**: Dispatch payloads and the event union
//! - **State Layer**: Reconciler, hooks and the event pipeline
//! - **Infrastructure Layer**: In-memory store and metrics
//!
//! ## Module Structure
//!
//! ```text
//! chat_state/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, and store traits
//! +-- gateway/        Dispatch events and raw frames
//! +-- state/          Reconciler, hooks, and guild lifecycle
//! +-- infrastructure/ In-memory store and metrics
//! +-- shared/         Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Entities and store contract
pub mod domain;

// Gateway layer - Typed events
pub mod gateway;

// State layer - Event reconciliation
pub mod state;

// Infrastructure layer - Store and metrics implementations
pub mod infrastructure;

// Shared utilities
pub mod shared;

// Telemetry and observability
pub mod telemetry;
