//! PostgreSQL implementation of the event-store gateway.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::EventStore;
use super::models::{EventFilter, EventPatch, EventRecord, PlayerRecord};
use crate::domain::GameProposal;
use crate::error::BotError;

/// Postgres unique-constraint name guarding one registration per platform
/// user.
const PLAYER_UNIQUE_CONSTRAINT: &str = "players_external_user_id_key";

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// The pool hands out a connection per statement and takes it back
/// immediately, so no connection is pinned for the lifetime of a voting
/// window.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EventStore for PgEventStore {
    async fn ensure_schema(&self) -> Result<(), BotError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS game_events (
                id SERIAL PRIMARY KEY,
                game_type TEXT NOT NULL,
                game_date DATE NOT NULL,
                game_time TIME NOT NULL,
                attendee_player_id INTEGER
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY,
                external_user_id TEXT UNIQUE NOT NULL,
                display_name TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        tracing::debug!("schema ensured");
        Ok(())
    }

    async fn insert_event(&self, proposal: &GameProposal) -> Result<i32, BotError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO game_events (game_type, game_date, game_time) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&proposal.game_type)
        .bind(proposal.game_date)
        .bind(proposal.game_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>, BotError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, game_type, game_date, game_time, attendee_player_id FROM game_events",
        );

        // Filters are AND-combined; only bound parameters ever carry
        // user-supplied values.
        builder.push(" WHERE TRUE");
        if let Some(id) = filter.id {
            builder.push(" AND id = ").push_bind(id);
        }
        if let Some(game_type) = &filter.game_type {
            builder.push(" AND game_type = ").push_bind(game_type);
        }
        if let Some(game_date) = filter.game_date {
            builder.push(" AND game_date = ").push_bind(game_date);
        }
        if let Some(game_time) = filter.game_time {
            builder.push(" AND game_time = ").push_bind(game_time);
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<(i32, String, NaiveDate, NaiveTime, Option<i32>)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, game_type, game_date, game_time, attendee_player_id)| EventRecord {
                    id,
                    game_type,
                    game_date,
                    game_time,
                    attendee_player_id,
                },
            )
            .collect())
    }

    async fn update_event(&self, id: i32, patch: &EventPatch) -> Result<u64, BotError> {
        if patch.is_empty() {
            return Err(BotError::InvalidCommand("no fields to update".to_string()));
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE game_events SET ");
        let mut separated = builder.separated(", ");
        if let Some(game_type) = &patch.game_type {
            separated.push("game_type = ").push_bind_unseparated(game_type);
        }
        if let Some(game_date) = patch.game_date {
            separated.push("game_date = ").push_bind_unseparated(game_date);
        }
        if let Some(game_time) = patch.game_time {
            separated.push("game_time = ").push_bind_unseparated(game_time);
        }
        if let Some(attendee) = patch.attendee_player_id {
            separated
                .push("attendee_player_id = ")
                .push_bind_unseparated(attendee);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete_event(&self, id: i32) -> Result<u64, BotError> {
        let result = sqlx::query("DELETE FROM game_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_player(
        &self,
        external_user_id: &str,
        display_name: &str,
    ) -> Result<i32, BotError> {
        // Ids are contiguous by invariant, so the next id is max+1. The
        // read and the insert share one transaction.
        let mut tx = self.pool.begin().await?;

        let next_id = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(id), 0) + 1 FROM players",
        )
        .fetch_one(&mut *tx)
        .await?;

        let inserted = sqlx::query(
            "INSERT INTO players (id, external_user_id, display_name) VALUES ($1, $2, $3)",
        )
        .bind(next_id)
        .bind(external_user_id)
        .bind(display_name)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                tx.commit().await?;
                Ok(next_id)
            }
            Err(err) => {
                let duplicate = err
                    .as_database_error()
                    .is_some_and(|db| db.constraint() == Some(PLAYER_UNIQUE_CONSTRAINT));
                if duplicate {
                    Err(BotError::AlreadyRegistered(external_user_id.to_string()))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    async fn query_players(&self) -> Result<Vec<PlayerRecord>, BotError> {
        let rows = sqlx::query_as::<_, (i32, String, String)>(
            "SELECT id, external_user_id, display_name FROM players ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, external_user_id, display_name)| PlayerRecord {
                id,
                external_user_id,
                display_name,
            })
            .collect())
    }

    async fn delete_player(&self, id: i32) -> Result<u64, BotError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        // Resequence survivors to 1..N. Row-by-row in ascending id order:
        // each target id is already vacated by the time it is assigned, so
        // the primary key stays unique at every step.
        let survivors = sqlx::query_scalar::<_, i32>("SELECT id FROM players ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

        for (index, old_id) in survivors.into_iter().enumerate() {
            let new_id = i32::try_from(index)
                .map_err(|_| BotError::Internal("player count exceeds i32".to_string()))?
                .saturating_add(1);
            if new_id != old_id {
                sqlx::query("UPDATE players SET id = $1 WHERE id = $2")
                    .bind(new_id)
                    .bind(old_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(deleted)
    }
}
