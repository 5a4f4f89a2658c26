//! # Domain Layer
//!
//! Entities cached by the client and the contract of the store holding them.
//! It is independent of any concrete store or transport.
//!
//! ## Structure
//!
//! - **entities**: Cached entities (Guild, Channel, Member, Message, etc.)
//! - **value_objects**: Immutable value types (Snowflake)
//! - **store**: The combined store contract and its optional reset capability

pub mod entities;
pub mod store;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use store::{Store, StoreResetter};
pub use value_objects::*;
