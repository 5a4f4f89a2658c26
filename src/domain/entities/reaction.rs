//! Message Reaction aggregate.
//!
//! Reactions are embedded in their message: one record per distinct emoji,
//! holding the number of users who reacted and whether the current user is
//! one of them. A record never sits at zero; it is removed instead.

use serde::{Deserialize, Serialize};

use super::Emoji;

/// Aggregated reaction on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Number of users who reacted with this emoji
    pub count: u32,

    /// Whether the current user has reacted with this emoji
    #[serde(default)]
    pub me: bool,

    /// Emoji identifier
    pub emoji: Emoji,
}

impl Reaction {
    /// The first reaction for an emoji.
    pub fn first(emoji: Emoji, me: bool) -> Self {
        Self { count: 1, me, emoji }
    }
}

/// Position of the reaction record for `emoji`, if any.
pub fn find_reaction(reactions: &[Reaction], emoji: &Emoji) -> Option<usize> {
    reactions.iter().position(|r| r.emoji.same_as(emoji))
}
