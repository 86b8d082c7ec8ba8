//! gamenight-bot entry point.
//!
//! Wires the process context: tracing, configuration, the PostgreSQL
//! store (schema ensured idempotently), the reaction bus, and the vote
//! coordinator. The chat gateway adapter plugs into the constructed
//! [`AppState`]; without one the process simply holds the core ready.
//!
//! Shutdown is ctrl-c. In-flight vote sessions are not flushed to storage:
//! an unresolved session is an un-ratified proposal and is simply lost.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use gamenight_bot::app_state::AppState;
use gamenight_bot::chat::{ChatPort, DisconnectedChat};
use gamenight_bot::config::BotConfig;
use gamenight_bot::domain::{ReactionBus, SessionRegistry};
use gamenight_bot::persistence::EventStore;
use gamenight_bot::persistence::postgres::PgEventStore;
use gamenight_bot::service::VoteCoordinator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BotConfig::from_env();
    tracing::info!(
        pass_threshold = config.pass_threshold,
        fail_threshold = config.fail_threshold,
        window_secs = config.vote_window_secs,
        "starting gamenight-bot"
    );

    // Connect the store; connections are acquired per operation afterwards.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool));
    store.ensure_schema().await?;
    tracing::info!("event store ready");

    // Build the process context
    let reactions = ReactionBus::new(config.reaction_bus_capacity);
    let sessions = Arc::new(SessionRegistry::new());
    // The platform gateway adapter replaces DisconnectedChat when wired
    // in; until then vote commands report a delivery error and the CRUD
    // surface keeps working.
    let chat: Arc<dyn ChatPort> = Arc::new(DisconnectedChat);
    let coordinator = Arc::new(VoteCoordinator::new(
        Arc::clone(&store),
        chat,
        reactions.clone(),
        sessions,
    ));
    let _app_state = AppState {
        coordinator,
        store,
        reactions,
        default_policy: config.vote_policy(),
    };

    tracing::info!("core initialized; waiting for shutdown signal");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down; in-flight vote sessions are discarded");

    Ok(())
}
