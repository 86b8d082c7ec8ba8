//! Reaction events delivered by the chat platform.
//!
//! The gateway adapter publishes every reaction it sees through the
//! [`super::ReactionBus`]; each vote session filters the stream down to the
//! reactions that qualify for its own published message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProposalId, UserId};

/// The two recognized vote symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteSymbol {
    /// Thumbs-up, an up-vote.
    ThumbsUp,
    /// Thumbs-down, a down-vote.
    ThumbsDown,
}

impl VoteSymbol {
    /// Maps a raw emoji string to a recognized vote symbol, if any.
    #[must_use]
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            "\u{1f44d}" => Some(Self::ThumbsUp),
            "\u{1f44e}" => Some(Self::ThumbsDown),
            _ => None,
        }
    }

    /// The direction this symbol votes in.
    #[must_use]
    pub const fn direction(self) -> VoteDirection {
        match self {
            Self::ThumbsUp => VoteDirection::Up,
            Self::ThumbsDown => VoteDirection::Down,
        }
    }
}

/// Direction of a counted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    /// Counts toward the pass threshold.
    Up,
    /// Counts toward the fail threshold.
    Down,
}

/// A single reaction-add event on some message.
///
/// Unfiltered: carries reactions on any message with any emoji. Whether it
/// qualifies for a given session is decided by
/// [`super::VoteSession::qualifies`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Message the reaction was placed on.
    pub message_id: ProposalId,
    /// User who reacted.
    pub user_id: UserId,
    /// Raw emoji as delivered by the platform.
    pub emoji: String,
    /// Delivery timestamp.
    pub timestamp: DateTime<Utc>,
}

impl ReactionEvent {
    /// Convenience constructor stamping the current time.
    #[must_use]
    pub fn new(message_id: ProposalId, user_id: UserId, emoji: impl Into<String>) -> Self {
        Self {
            message_id,
            user_id,
            emoji: emoji.into(),
            timestamp: Utc::now(),
        }
    }

    /// The vote symbol this reaction carries, if it is one of the two
    /// recognized emoji.
    #[must_use]
    pub fn vote_symbol(&self) -> Option<VoteSymbol> {
        VoteSymbol::from_emoji(&self.emoji)
    }
}
