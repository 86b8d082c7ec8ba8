//! Explicit process context shared by the command surface.
//!
//! Replaces the ambient module-level globals of earlier bot generations:
//! constructed once at startup and passed into command dispatch and the
//! gateway adapter. No other shared mutable state exists between sessions.

use std::sync::Arc;

use crate::domain::ReactionBus;
use crate::persistence::EventStore;
use crate::service::{VoteCoordinator, VotePolicy};

/// Process-wide context handed to the command surface.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Orchestrator for proposal voting.
    pub coordinator: Arc<VoteCoordinator>,
    /// Store gateway for the direct CRUD commands.
    pub store: Arc<dyn EventStore>,
    /// Bus the gateway adapter publishes reactions into.
    pub reactions: ReactionBus,
    /// Default vote policy from configuration.
    pub default_policy: VotePolicy,
}
