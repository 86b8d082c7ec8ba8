//! # gamenight-bot
//!
//! Vote-coordination core for a chat bot that schedules tabletop game
//! sessions. A user proposes a session; members vote with reactions on the
//! published message inside a wall-clock window; each proposal resolves to
//! exactly one terminal outcome, and passed proposals are persisted.
//!
//! The chat platform itself is an external collaborator behind the
//! [`chat::ChatPort`] trait; its adapter publishes every incoming reaction
//! into the [`domain::ReactionBus`] and feeds parsed commands into
//! [`command::dispatch`].
//!
//! ## Architecture
//!
//! ```text
//! Chat gateway adapter (external)
//!     │
//!     ├── Command dispatch (command)
//!     │       ├── VoteCoordinator (service)   one task per open vote
//!     │       │       ├── VoteSession + VoteTally (domain)
//!     │       │       └── ReactionBus (domain)
//!     │       └── EventStore (persistence)
//!     │               ├── PostgreSQL backend
//!     │               └── in-memory backend
//!     └── AppState (app_state)   explicit process context, no globals
//! ```

pub mod app_state;
pub mod chat;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
