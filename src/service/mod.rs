//! Service layer: the vote session orchestrator.

pub mod coordinator;

pub use coordinator::{ProposalHandle, VoteCoordinator, VotePolicy};
