//! Persistence layer: the event-store gateway contract and its backends.
//!
//! [`EventStore`] is the thin contract the rest of the bot talks to.
//! [`postgres::PgEventStore`] is the production backend; every statement
//! uses bound parameters; user-supplied values are never interpolated
//! into SQL text. [`memory::MemoryEventStore`] mirrors the same observable
//! semantics in memory and backs the orchestrator and command tests.
//!
//! Connections are acquired from the pool per operation and released
//! immediately; nothing is held across a voting window.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::GameProposal;
use crate::error::BotError;
use models::{EventFilter, EventPatch, EventRecord, PlayerRecord};

/// CRUD contract for persisted events and players.
#[async_trait]
pub trait EventStore: Send + Sync + std::fmt::Debug {
    /// Idempotently creates the event and player tables if absent.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] or [`BotError::Connection`] on failure.
    async fn ensure_schema(&self) -> Result<(), BotError>;

    /// Persists a candidate event, returning the store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] or [`BotError::Connection`] on failure.
    async fn insert_event(&self, proposal: &GameProposal) -> Result<i32, BotError>;

    /// Returns events matching the AND-combined filter; all rows when the
    /// filter is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] or [`BotError::Connection`] on failure.
    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>, BotError>;

    /// Applies a partial field update, returning the number of rows
    /// affected (0 when the id does not exist).
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidCommand`] for an empty patch, otherwise
    /// [`BotError::Store`]/[`BotError::Connection`] on failure.
    async fn update_event(&self, id: i32, patch: &EventPatch) -> Result<u64, BotError>;

    /// Deletes an event, returning the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] or [`BotError::Connection`] on failure.
    async fn delete_event(&self, id: i32) -> Result<u64, BotError>;

    /// Registers a player, returning the assigned contiguous id.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::AlreadyRegistered`] when the platform user id
    /// is already registered (the store is left unchanged), otherwise
    /// [`BotError::Store`]/[`BotError::Connection`] on failure.
    async fn insert_player(
        &self,
        external_user_id: &str,
        display_name: &str,
    ) -> Result<i32, BotError>;

    /// Returns all registered players in id order.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] or [`BotError::Connection`] on failure.
    async fn query_players(&self) -> Result<Vec<PlayerRecord>, BotError>;

    /// Removes a player, returning the number of rows affected, then
    /// resequences surviving ids to `1..N` in ascending original order.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Store`] or [`BotError::Connection`] on failure.
    async fn delete_player(&self, id: i32) -> Result<u64, BotError>;
}
