//! Domain layer: identifiers, schedule normalization, reactions, and the
//! per-proposal vote state machine.
//!
//! Everything here is in-memory and independent of the store and the chat
//! platform; the service layer wires it to both.

pub mod ids;
pub mod proposal;
pub mod reaction;
pub mod reaction_bus;
pub mod schedule;
pub mod session;
pub mod session_registry;
pub mod tally;

pub use ids::{ProposalId, UserId};
pub use proposal::GameProposal;
pub use reaction::{ReactionEvent, VoteDirection, VoteSymbol};
pub use reaction_bus::ReactionBus;
pub use session::{SessionState, VoteOutcome, VoteSession};
pub use session_registry::{SessionRegistry, SessionTicket};
pub use tally::{Decision, VoteTally};
