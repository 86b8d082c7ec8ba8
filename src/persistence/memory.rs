//! In-memory store with the same observable semantics as Postgres.
//!
//! Backs orchestrator and command tests; also usable for local runs
//! without a database. Keeps the contiguous-player-id invariant and the
//! registration idempotency guard identical to the real backend.

use tokio::sync::Mutex;

use super::EventStore;
use super::models::{EventFilter, EventPatch, EventRecord, PlayerRecord};
use crate::domain::GameProposal;
use crate::error::BotError;

#[derive(Debug, Default)]
struct Inner {
    events: Vec<EventRecord>,
    players: Vec<PlayerRecord>,
    next_event_id: i32,
}

/// In-memory double of the event store.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: Mutex<Inner>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted events. Test convenience.
    pub async fn event_count(&self) -> usize {
        self.inner.lock().await.events.len()
    }
}

#[async_trait::async_trait]
impl EventStore for MemoryEventStore {
    async fn ensure_schema(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn insert_event(&self, proposal: &GameProposal) -> Result<i32, BotError> {
        let mut inner = self.inner.lock().await;
        inner.next_event_id = inner.next_event_id.saturating_add(1);
        let id = inner.next_event_id;
        inner.events.push(EventRecord {
            id,
            game_type: proposal.game_type.clone(),
            game_date: proposal.game_date,
            game_time: proposal.game_time,
            attendee_player_id: None,
        });
        Ok(id)
    }

    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>, BotError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .events
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn update_event(&self, id: i32, patch: &EventPatch) -> Result<u64, BotError> {
        if patch.is_empty() {
            return Err(BotError::InvalidCommand("no fields to update".to_string()));
        }
        let mut inner = self.inner.lock().await;
        match inner.events.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                patch.apply_to(record);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_event(&self, id: i32) -> Result<u64, BotError> {
        let mut inner = self.inner.lock().await;
        let before = inner.events.len();
        inner.events.retain(|record| record.id != id);
        Ok((before - inner.events.len()) as u64)
    }

    async fn insert_player(
        &self,
        external_user_id: &str,
        display_name: &str,
    ) -> Result<i32, BotError> {
        let mut inner = self.inner.lock().await;
        if inner
            .players
            .iter()
            .any(|player| player.external_user_id == external_user_id)
        {
            return Err(BotError::AlreadyRegistered(external_user_id.to_string()));
        }
        let id = i32::try_from(inner.players.len())
            .map_err(|_| BotError::Internal("player count exceeds i32".to_string()))?
            .saturating_add(1);
        inner.players.push(PlayerRecord {
            id,
            external_user_id: external_user_id.to_string(),
            display_name: display_name.to_string(),
        });
        Ok(id)
    }

    async fn query_players(&self) -> Result<Vec<PlayerRecord>, BotError> {
        let inner = self.inner.lock().await;
        Ok(inner.players.clone())
    }

    async fn delete_player(&self, id: i32) -> Result<u64, BotError> {
        let mut inner = self.inner.lock().await;
        let before = inner.players.len();
        inner.players.retain(|player| player.id != id);
        if inner.players.len() == before {
            return Ok(0);
        }
        // Resequence to 1..N preserving relative order.
        for (index, player) in inner.players.iter_mut().enumerate() {
            player.id = i32::try_from(index)
                .map_err(|_| BotError::Internal("player count exceeds i32".to_string()))?
                .saturating_add(1);
        }
        Ok(1)
    }
}
