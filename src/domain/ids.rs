//! Type-safe platform identifiers.
//!
//! [`ProposalId`] and [`UserId`] are newtype wrappers around the chat
//! platform's numeric snowflake ids, so a message identity can never be
//! confused with a user identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an in-flight proposal.
///
/// This is the platform id of the published votable message. It scopes
/// reaction filtering, keys the [`super::SessionRegistry`], and appears in
/// every lifecycle log line for correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(u64);

impl ProposalId {
    /// Wraps a raw platform message id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw platform message id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProposalId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identity of a chat-platform user, including the bot itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw platform user id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw platform user id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
