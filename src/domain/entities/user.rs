//! User entity and the self-user store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;
use crate::shared::error::StoreError;

/// A user as seen over the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID
    pub id: Snowflake,

    /// Username (2-32 characters)
    #[serde(default)]
    pub username: String,

    /// Four digit discriminator, "0" for migrated accounts
    #[serde(default)]
    pub discriminator: String,

    /// Display name (optional, up to 32 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,

    /// Avatar hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Whether the account belongs to a bot
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Create a user with just an ID and username.
    pub fn new(id: impl Into<Snowflake>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Get the user's display name, falling back to username if not set.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// Store operations for the session's own user.
#[async_trait]
pub trait SelfStore: Send + Sync {
    /// The current user, if the session has been identified.
    async fn me(&self) -> Result<Option<User>, StoreError>;

    /// Replace the current user.
    async fn myself_set(&self, user: User) -> Result<(), StoreError>;
}
