//! Live-session bookkeeping keyed by proposal identity.
//!
//! [`SessionRegistry`] tracks which proposals currently have an open vote.
//! It holds metadata only: the [`super::VoteSession`] itself is owned by
//! its session task and never shared, so no per-entry locking is needed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ProposalId;

/// Metadata describing one live vote session.
#[derive(Debug, Clone)]
pub struct SessionTicket {
    /// Game category under vote.
    pub game_type: String,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
    /// Absolute deadline of the voting window.
    pub deadline: DateTime<Utc>,
}

/// Map from proposal identity to live-session metadata.
///
/// Part of the explicit process context: replaces the ambient globals the
/// bot once kept for in-flight votes. Sessions insert themselves on start
/// and evict themselves on resolution.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<ProposalId, SessionTicket>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly opened session. Returns `false` if the proposal
    /// id was already registered (platform message ids are unique, so this
    /// indicates a gateway bug; the caller logs and refuses the duplicate).
    pub async fn insert(&self, proposal_id: ProposalId, ticket: SessionTicket) -> bool {
        let mut map = self.sessions.write().await;
        if map.contains_key(&proposal_id) {
            return false;
        }
        map.insert(proposal_id, ticket);
        true
    }

    /// Evicts a resolved session, returning its ticket if it was present.
    pub async fn remove(&self, proposal_id: ProposalId) -> Option<SessionTicket> {
        self.sessions.write().await.remove(&proposal_id)
    }

    /// Returns the ticket for a live session, if any.
    pub async fn get(&self, proposal_id: ProposalId) -> Option<SessionTicket> {
        self.sessions.read().await.get(&proposal_id).cloned()
    }

    /// Number of currently open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` when no vote is in flight.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
