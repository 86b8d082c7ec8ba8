//! Typed command surface.
//!
//! Chat commands arrive as free text, are parsed by the gateway adapter
//! (out of scope here), and land as one of the closed [`Command`] variants
//! below: every argument typed and validated before dispatch, replacing
//! the duck-typed argument dicts of earlier bot generations.

use crate::app_state::AppState;
use crate::domain::{ProposalId, schedule};
use crate::error::BotError;
use crate::persistence::models::{EventFilter, EventPatch, EventRecord, PlayerRecord};

/// Raw (still-textual) filter arguments for `ListEvents`; date and time
/// halves are normalized during dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Match a single event id.
    pub id: Option<i32>,
    /// Match a game category.
    pub game_type: Option<String>,
    /// Match a date, `DD-MM-YYYY`.
    pub date: Option<String>,
    /// Match a time, `HH:MM`.
    pub time: Option<String>,
}

/// Closed set of commands the surface can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Persist an event directly, skipping the vote.
    MakeEventNoVote {
        /// Game category.
        game_type: String,
        /// Date text, `DD-MM-YYYY`.
        date: String,
        /// Time text, `HH:MM`.
        time: String,
    },
    /// Open a vote on a proposed event.
    MakeEventVote {
        /// Game category.
        game_type: String,
        /// Date text, `DD-MM-YYYY`.
        date: String,
        /// Time text, `HH:MM`.
        time: String,
    },
    /// List persisted events, optionally filtered (AND-combined).
    ListEvents(EventQuery),
    /// Partially update an event.
    EditEvent {
        /// Target event id.
        id: i32,
        /// New game category, if changing.
        game_type: Option<String>,
        /// New date text, if changing.
        date: Option<String>,
        /// New time text, if changing.
        time: Option<String>,
    },
    /// Delete an event.
    DeleteEvent {
        /// Target event id.
        id: i32,
    },
    /// Self-register as a player.
    RegisterPlayer {
        /// Platform user identifier.
        external_user_id: String,
        /// Display name for listings.
        display_name: String,
    },
    /// Remove a player; surviving ids are resequenced.
    RemovePlayer {
        /// Target player id.
        id: i32,
    },
    /// Mark a player as attending an event.
    AttendEvent {
        /// Target event id.
        event_id: i32,
        /// Attending player id.
        player_id: i32,
    },
    /// List registered players.
    ListPlayers,
}

/// Categorized result the surface renders back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A vote session was opened; its outcome arrives later as a
    /// notification.
    VoteStarted(ProposalId),
    /// The command succeeded; rendered result text.
    Ok(String),
    /// The targeted id does not exist.
    NotFound(String),
    /// The command failed; rendered error text.
    Error(String),
}

impl CommandOutcome {
    /// The user-facing line for this outcome.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::VoteStarted(id) => {
                format!("Vote opened (proposal {id}). React 👍 or 👎 to decide.")
            }
            Self::Ok(text) | Self::NotFound(text) | Self::Error(text) => text.clone(),
        }
    }
}

/// Executes one command against the process context.
///
/// Never returns an error: every failure is folded into a categorized
/// outcome, so one bad command cannot take down the listening loop.
pub async fn dispatch(command: Command, state: &AppState) -> CommandOutcome {
    match command {
        Command::MakeEventNoVote {
            game_type,
            date,
            time,
        } => make_event_no_vote(state, &game_type, &date, &time).await,
        Command::MakeEventVote {
            game_type,
            date,
            time,
        } => match state
            .coordinator
            .propose(&game_type, &date, &time, state.default_policy)
            .await
        {
            Ok(handle) => CommandOutcome::VoteStarted(handle.proposal_id),
            Err(err) => CommandOutcome::Error(err.user_message()),
        },
        Command::ListEvents(query) => list_events(state, query).await,
        Command::EditEvent {
            id,
            game_type,
            date,
            time,
        } => edit_event(state, id, game_type, date, time).await,
        Command::DeleteEvent { id } => match state.store.delete_event(id).await {
            Ok(0) => CommandOutcome::NotFound(BotError::EventNotFound(id).user_message()),
            Ok(_) => CommandOutcome::Ok(format!("Deleted event #{id}.")),
            Err(err) => CommandOutcome::Error(err.user_message()),
        },
        Command::RegisterPlayer {
            external_user_id,
            display_name,
        } => match state
            .store
            .insert_player(&external_user_id, &display_name)
            .await
        {
            Ok(id) => CommandOutcome::Ok(format!("Registered {display_name} as player #{id}.")),
            Err(err) => CommandOutcome::Error(err.user_message()),
        },
        Command::RemovePlayer { id } => match state.store.delete_player(id).await {
            Ok(0) => CommandOutcome::NotFound(BotError::PlayerNotFound(id).user_message()),
            Ok(_) => CommandOutcome::Ok(format!(
                "Removed player #{id}; remaining players were renumbered."
            )),
            Err(err) => CommandOutcome::Error(err.user_message()),
        },
        Command::AttendEvent {
            event_id,
            player_id,
        } => attend_event(state, event_id, player_id).await,
        Command::ListPlayers => match state.store.query_players().await {
            Ok(players) => CommandOutcome::Ok(render_players(&players)),
            Err(err) => CommandOutcome::Error(err.user_message()),
        },
    }
}

async fn make_event_no_vote(
    state: &AppState,
    game_type: &str,
    date: &str,
    time: &str,
) -> CommandOutcome {
    let parsed = schedule::parse(date, time);
    let (game_date, game_time) = match parsed {
        Ok(values) => values,
        Err(err) => return CommandOutcome::Error(err.user_message()),
    };
    let proposal = crate::domain::GameProposal::new(game_type, game_date, game_time);
    match state.store.insert_event(&proposal).await {
        Ok(id) => CommandOutcome::Ok(format!("Created event #{id}: {}.", proposal.describe())),
        Err(err) => CommandOutcome::Error(err.user_message()),
    }
}

async fn list_events(state: &AppState, query: EventQuery) -> CommandOutcome {
    let mut filter = EventFilter {
        id: query.id,
        game_type: query.game_type,
        ..EventFilter::default()
    };
    if let Some(date_text) = &query.date {
        match schedule::parse_date(date_text) {
            Ok(date) => filter.game_date = Some(date),
            Err(err) => return CommandOutcome::Error(err.user_message()),
        }
    }
    if let Some(time_text) = &query.time {
        match schedule::parse_time(time_text) {
            Ok(time) => filter.game_time = Some(time),
            Err(err) => return CommandOutcome::Error(err.user_message()),
        }
    }
    match state.store.query_events(&filter).await {
        Ok(events) => CommandOutcome::Ok(render_events(&events)),
        Err(err) => CommandOutcome::Error(err.user_message()),
    }
}

async fn edit_event(
    state: &AppState,
    id: i32,
    game_type: Option<String>,
    date: Option<String>,
    time: Option<String>,
) -> CommandOutcome {
    let mut patch = EventPatch {
        game_type,
        ..EventPatch::default()
    };
    if let Some(date_text) = &date {
        match schedule::parse_date(date_text) {
            Ok(parsed) => patch.game_date = Some(parsed),
            Err(err) => return CommandOutcome::Error(err.user_message()),
        }
    }
    if let Some(time_text) = &time {
        match schedule::parse_time(time_text) {
            Ok(parsed) => patch.game_time = Some(parsed),
            Err(err) => return CommandOutcome::Error(err.user_message()),
        }
    }
    match state.store.update_event(id, &patch).await {
        Ok(0) => CommandOutcome::NotFound(BotError::EventNotFound(id).user_message()),
        Ok(_) => CommandOutcome::Ok(format!("Updated event #{id}.")),
        Err(err) => CommandOutcome::Error(err.user_message()),
    }
}

async fn attend_event(state: &AppState, event_id: i32, player_id: i32) -> CommandOutcome {
    // The attendee reference is weak, but pointing it at a player that was
    // never registered is always a caller mistake worth catching.
    match state.store.query_players().await {
        Ok(players) if players.iter().any(|p| p.id == player_id) => {}
        Ok(_) => {
            return CommandOutcome::NotFound(BotError::PlayerNotFound(player_id).user_message());
        }
        Err(err) => return CommandOutcome::Error(err.user_message()),
    }
    let patch = EventPatch {
        attendee_player_id: Some(player_id),
        ..EventPatch::default()
    };
    match state.store.update_event(event_id, &patch).await {
        Ok(0) => CommandOutcome::NotFound(BotError::EventNotFound(event_id).user_message()),
        Ok(_) => CommandOutcome::Ok(format!(
            "Player #{player_id} is attending event #{event_id}."
        )),
        Err(err) => CommandOutcome::Error(err.user_message()),
    }
}

fn render_events(events: &[EventRecord]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    events
        .iter()
        .map(|event| {
            let attendee = event
                .attendee_player_id
                .map(|id| format!(" (attendee: player #{id})"))
                .unwrap_or_default();
            format!(
                "#{} {} on {} at {}{attendee}",
                event.id,
                event.game_type,
                event.game_date.format("%d-%m-%Y"),
                event.game_time.format("%H:%M"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_players(players: &[PlayerRecord]) -> String {
    if players.is_empty() {
        return "No players registered.".to_string();
    }
    players
        .iter()
        .map(|player| format!("#{} {}", player.id, player.display_name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::chat::ChatPort;
    use crate::domain::{GameProposal, ReactionBus, SessionRegistry, UserId};
    use crate::persistence::EventStore;
    use crate::persistence::memory::MemoryEventStore;
    use crate::service::{VoteCoordinator, VotePolicy};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::assert_ok;

    /// Chat double that accepts every publish with sequential ids.
    #[derive(Debug, Default)]
    struct SilentChat {
        counter: std::sync::atomic::AtomicU64,
    }

    #[async_trait]
    impl ChatPort for SilentChat {
        fn self_user(&self) -> UserId {
            UserId::new(1)
        }

        async fn publish_proposal(&self, _candidate: &GameProposal) -> Result<ProposalId, BotError> {
            let next = self
                .counter
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(ProposalId::new(next + 1))
        }

        async fn notify(&self, _proposal_id: ProposalId, _text: &str) -> Result<(), BotError> {
            Ok(())
        }
    }

    fn make_state() -> AppState {
        let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new());
        let chat: Arc<dyn ChatPort> = Arc::new(SilentChat::default());
        let reactions = ReactionBus::new(64);
        let coordinator = Arc::new(VoteCoordinator::new(
            Arc::clone(&store),
            chat,
            reactions.clone(),
            Arc::new(SessionRegistry::new()),
        ));
        AppState {
            coordinator,
            store,
            reactions,
            default_policy: VotePolicy {
                pass_threshold: 2,
                fail_threshold: 1,
                voting_window: Duration::from_secs(60),
            },
        }
    }

    #[tokio::test]
    async fn make_event_no_vote_persists_immediately() {
        let state = make_state();
        let outcome = dispatch(
            Command::MakeEventNoVote {
                game_type: "dnd".to_string(),
                date: "24-12-2026".to_string(),
                time: "19:30".to_string(),
            },
            &state,
        )
        .await;
        assert!(matches!(outcome, CommandOutcome::Ok(_)));

        let events = assert_ok!(state.store.query_events(&EventFilter::default()).await);
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn bad_date_is_an_error_outcome_with_no_side_effects() {
        let state = make_state();
        let outcome = dispatch(
            Command::MakeEventNoVote {
                game_type: "dnd".to_string(),
                date: "99-99-9999".to_string(),
                time: "19:30".to_string(),
            },
            &state,
        )
        .await;
        assert!(matches!(outcome, CommandOutcome::Error(_)));

        let events = assert_ok!(state.store.query_events(&EventFilter::default()).await);
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn make_event_vote_opens_a_session() {
        let state = make_state();
        let outcome = dispatch(
            Command::MakeEventVote {
                game_type: "dnd".to_string(),
                date: "24-12-2026".to_string(),
                time: "19:30".to_string(),
            },
            &state,
        )
        .await;
        let CommandOutcome::VoteStarted(id) = outcome else {
            panic!("expected a vote session");
        };
        assert!(state.coordinator.sessions().get(id).await.is_some());
        assert!(CommandOutcome::VoteStarted(id).text().contains("Vote opened"));
    }

    #[tokio::test]
    async fn list_events_filters_by_type_and_date() {
        let state = make_state();
        for (game_type, date) in [("dnd", "01-05-2026"), ("dnd", "02-05-2026"), ("catan", "01-05-2026")] {
            let outcome = dispatch(
                Command::MakeEventNoVote {
                    game_type: game_type.to_string(),
                    date: date.to_string(),
                    time: "18:00".to_string(),
                },
                &state,
            )
            .await;
            assert!(matches!(outcome, CommandOutcome::Ok(_)));
        }

        let outcome = dispatch(
            Command::ListEvents(EventQuery {
                game_type: Some("dnd".to_string()),
                date: Some("01-05-2026".to_string()),
                ..EventQuery::default()
            }),
            &state,
        )
        .await;
        let CommandOutcome::Ok(text) = outcome else {
            panic!("expected a listing");
        };
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("dnd"));
    }

    #[tokio::test]
    async fn edit_missing_event_is_not_found() {
        let state = make_state();
        let outcome = dispatch(
            Command::EditEvent {
                id: 42,
                game_type: Some("catan".to_string()),
                date: None,
                time: None,
            },
            &state,
        )
        .await;
        assert!(matches!(outcome, CommandOutcome::NotFound(_)));
    }

    #[tokio::test]
    async fn edit_with_no_fields_is_an_error() {
        let state = make_state();
        let outcome = dispatch(
            Command::EditEvent {
                id: 1,
                game_type: None,
                date: None,
                time: None,
            },
            &state,
        )
        .await;
        assert!(matches!(outcome, CommandOutcome::Error(_)));
    }

    #[tokio::test]
    async fn delete_event_round_trip() {
        let state = make_state();
        let _ = dispatch(
            Command::MakeEventNoVote {
                game_type: "dnd".to_string(),
                date: "24-12-2026".to_string(),
                time: "19:30".to_string(),
            },
            &state,
        )
        .await;

        let deleted = dispatch(Command::DeleteEvent { id: 1 }, &state).await;
        assert!(matches!(deleted, CommandOutcome::Ok(_)));

        let again = dispatch(Command::DeleteEvent { id: 1 }, &state).await;
        assert!(matches!(again, CommandOutcome::NotFound(_)));
    }

    #[tokio::test]
    async fn double_registration_is_reported() {
        let state = make_state();
        let first = dispatch(
            Command::RegisterPlayer {
                external_user_id: "user#42".to_string(),
                display_name: "Alice".to_string(),
            },
            &state,
        )
        .await;
        assert!(matches!(first, CommandOutcome::Ok(_)));

        let second = dispatch(
            Command::RegisterPlayer {
                external_user_id: "user#42".to_string(),
                display_name: "Alice".to_string(),
            },
            &state,
        )
        .await;
        let CommandOutcome::Error(text) = second else {
            panic!("expected a report");
        };
        assert!(text.contains("already registered"));
    }

    #[tokio::test]
    async fn attend_event_requires_both_ids_to_exist() {
        let state = make_state();
        let _ = dispatch(
            Command::MakeEventNoVote {
                game_type: "dnd".to_string(),
                date: "24-12-2026".to_string(),
                time: "19:30".to_string(),
            },
            &state,
        )
        .await;
        let _ = dispatch(
            Command::RegisterPlayer {
                external_user_id: "user#1".to_string(),
                display_name: "Alice".to_string(),
            },
            &state,
        )
        .await;

        let missing_player = dispatch(
            Command::AttendEvent {
                event_id: 1,
                player_id: 9,
            },
            &state,
        )
        .await;
        assert!(matches!(missing_player, CommandOutcome::NotFound(_)));

        let missing_event = dispatch(
            Command::AttendEvent {
                event_id: 9,
                player_id: 1,
            },
            &state,
        )
        .await;
        assert!(matches!(missing_event, CommandOutcome::NotFound(_)));

        let attended = dispatch(
            Command::AttendEvent {
                event_id: 1,
                player_id: 1,
            },
            &state,
        )
        .await;
        assert!(matches!(attended, CommandOutcome::Ok(_)));

        let events = assert_ok!(state.store.query_events(&EventFilter::default()).await);
        assert_eq!(events.first().and_then(|e| e.attendee_player_id), Some(1));
    }

    #[tokio::test]
    async fn list_players_renders_roster() {
        let state = make_state();
        for (user, name) in [("u1", "Alice"), ("u2", "Bob")] {
            let _ = dispatch(
                Command::RegisterPlayer {
                    external_user_id: user.to_string(),
                    display_name: name.to_string(),
                },
                &state,
            )
            .await;
        }
        let outcome = dispatch(Command::ListPlayers, &state).await;
        let CommandOutcome::Ok(text) = outcome else {
            panic!("expected a roster");
        };
        assert_eq!(text, "#1 Alice\n#2 Bob");
    }
}
