//! # Value Objects
//!
//! Immutable value types shared by every entity.

mod snowflake;

pub use snowflake::{Snowflake, DISCORD_EPOCH};
