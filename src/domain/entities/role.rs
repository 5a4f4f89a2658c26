//! Role entity and store contract.
//!
//! Roles live inside their guild; the store keys them by (guild, role).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// Represents a role in a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Snowflake ID
    pub id: Snowflake,

    /// Role name (up to 100 characters)
    #[serde(default)]
    pub name: String,

    /// Role color (RGB integer, 0 for no color)
    #[serde(default)]
    pub color: u32,

    /// Whether this role is hoisted (shown separately in member list)
    #[serde(default)]
    pub hoist: bool,

    /// Position in the role hierarchy (higher = more priority)
    #[serde(default)]
    pub position: i32,

    /// Permission bitfield, sent as a decimal string on the wire
    #[serde(default, with = "permission_bits")]
    pub permissions: u64,

    /// Whether this role is managed by an integration
    #[serde(default)]
    pub managed: bool,

    /// Whether this role is mentionable by everyone
    #[serde(default)]
    pub mentionable: bool,
}

impl Role {
    /// Check if the role grants every bit in `permission`.
    pub fn has_permission(&self, permission: u64) -> bool {
        self.permissions & permission == permission
    }
}

mod permission_bits {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bits: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(bits)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Bits {
            Text(String),
            Number(u64),
        }

        match Bits::deserialize(deserializer)? {
            Bits::Number(n) => Ok(n),
            Bits::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Store operations for guild roles.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Result<Option<Role>, StoreError>;

    async fn roles(&self, guild_id: Snowflake) -> Result<Vec<Role>, StoreError>;

    /// Insert or replace a role in its guild.
    async fn role_set(&self, guild_id: Snowflake, role: Role) -> Result<(), StoreError>;

    async fn role_remove(&self, guild_id: Snowflake, role_id: Snowflake) -> Result<(), StoreError>;
}
