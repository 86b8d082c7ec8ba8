//! Chat-platform gateway boundary.
//!
//! The real gateway (message delivery, embed rendering, reaction intake)
//! is an external collaborator. The core only needs the three operations
//! below; the gateway adapter implements them and feeds every incoming
//! reaction into the [`crate::domain::ReactionBus`].

use async_trait::async_trait;

use crate::domain::{GameProposal, ProposalId, UserId};
use crate::error::BotError;

/// Operations the vote core needs from the chat platform.
#[async_trait]
pub trait ChatPort: Send + Sync + std::fmt::Debug {
    /// The bot's own user identity, excluded from vote counting.
    fn self_user(&self) -> UserId;

    /// Renders and publishes a votable message for the candidate.
    ///
    /// Returns the published message's identity, which becomes the
    /// session's [`ProposalId`].
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Chat`] when the platform rejects the send.
    async fn publish_proposal(&self, candidate: &GameProposal) -> Result<ProposalId, BotError>;

    /// Sends an outcome notification or error report tied to a proposal.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Chat`] when the platform rejects the send.
    async fn notify(&self, proposal_id: ProposalId, text: &str) -> Result<(), BotError>;
}

/// Placeholder port used until a platform adapter is wired in.
///
/// Every publish reports a delivery error, so vote commands fail with a
/// user-correctable message while the rest of the core (CRUD, store)
/// keeps working.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedChat;

#[async_trait]
impl ChatPort for DisconnectedChat {
    fn self_user(&self) -> UserId {
        UserId::new(0)
    }

    async fn publish_proposal(&self, _candidate: &GameProposal) -> Result<ProposalId, BotError> {
        Err(BotError::Chat("no chat gateway connected".to_string()))
    }

    async fn notify(&self, _proposal_id: ProposalId, _text: &str) -> Result<(), BotError> {
        Err(BotError::Chat("no chat gateway connected".to_string()))
    }
}
