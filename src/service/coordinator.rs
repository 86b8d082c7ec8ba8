//! Vote session orchestrator.
//!
//! [`VoteCoordinator`] owns the lifecycle of every proposal: normalize the
//! schedule, publish the votable message, spawn the single-owner session
//! task, and resolve exactly one terminal outcome. Each session task races
//! a filtered reaction stream against the voting deadline inside
//! `tokio::select!`; sessions never share mutable state, so independent
//! proposals cannot contend on one another.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::chat::ChatPort;
use crate::domain::{
    Decision, GameProposal, ProposalId, ReactionBus, ReactionEvent, SessionRegistry, SessionState,
    SessionTicket, VoteOutcome, VoteSession, VoteTally, schedule,
};
use crate::error::BotError;
use crate::persistence::EventStore;

/// Fixed voting parameters supplied at session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePolicy {
    /// Up-votes required to pass.
    pub pass_threshold: u32,
    /// Down-votes required to fail.
    pub fail_threshold: u32,
    /// Length of the voting window.
    pub voting_window: Duration,
}

/// Correlation handle for a started vote session.
///
/// Dropping the handle detaches the session; it keeps running and reports
/// through the chat port regardless.
#[derive(Debug)]
pub struct ProposalHandle {
    /// Identity of the published votable message.
    pub proposal_id: ProposalId,
    task: JoinHandle<Option<VoteOutcome>>,
}

impl ProposalHandle {
    /// Awaits the session's terminal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Internal`] if the session was abandoned at
    /// shutdown (reaction bus closed) or its task failed.
    pub async fn outcome(self) -> Result<VoteOutcome, BotError> {
        match self.task.await {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => Err(BotError::Internal(
                "session abandoned before resolution".to_string(),
            )),
            Err(err) => Err(BotError::Internal(format!("session task failed: {err}"))),
        }
    }
}

/// Orchestration layer for proposal voting.
///
/// Stateless coordinator holding the process context handles: store, chat
/// port, reaction bus, and the live-session registry. Every mutation
/// follows the pattern: resolve state -> persist (Pass only) -> notify ->
/// evict -> log.
#[derive(Debug, Clone)]
pub struct VoteCoordinator {
    store: Arc<dyn EventStore>,
    chat: Arc<dyn ChatPort>,
    reactions: ReactionBus,
    sessions: Arc<SessionRegistry>,
}

impl VoteCoordinator {
    /// Creates a new coordinator.
    #[must_use]
    pub fn new(
        store: Arc<dyn EventStore>,
        chat: Arc<dyn ChatPort>,
        reactions: ReactionBus,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            store,
            chat,
            reactions,
            sessions,
        }
    }

    /// Returns the live-session registry.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Starts a vote on a proposed session.
    ///
    /// Normalizes the schedule text first: a format failure returns before
    /// any session exists or any message is published. On success the
    /// candidate is published for voting and a dedicated task listens for
    /// qualifying reactions until a threshold is met or the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Format`] for bad schedule text, [`BotError::Chat`]
    /// when publishing fails, or [`BotError::Internal`] on a duplicate
    /// proposal identity.
    pub async fn propose(
        &self,
        game_type: &str,
        date_text: &str,
        time_text: &str,
        policy: VotePolicy,
    ) -> Result<ProposalHandle, BotError> {
        let (game_date, game_time) = schedule::parse(date_text, time_text)?;
        let candidate = GameProposal::new(game_type, game_date, game_time);

        let window = chrono::Duration::from_std(policy.voting_window)
            .map_err(|_| BotError::InvalidCommand("voting window too long".to_string()))?;

        let proposal_id = self.chat.publish_proposal(&candidate).await?;

        // Subscribe before spawning so reactions arriving from here on are
        // never missed.
        let receiver = self.reactions.subscribe();

        let opened_at = Utc::now();
        let deadline = opened_at + window;
        let ticket = SessionTicket {
            game_type: candidate.game_type.clone(),
            opened_at,
            deadline,
        };
        if !self.sessions.insert(proposal_id, ticket).await {
            return Err(BotError::Internal(format!(
                "proposal {proposal_id} already has a live session"
            )));
        }

        let tally = VoteTally::new(
            policy.pass_threshold,
            policy.fail_threshold,
            self.chat.self_user(),
        );
        let session = VoteSession::new(proposal_id, candidate, tally, deadline);

        tracing::info!(
            %proposal_id,
            game_type,
            window_secs = policy.voting_window.as_secs(),
            "vote session opened"
        );

        let task = tokio::spawn(run_session(
            session,
            receiver,
            policy.voting_window,
            Arc::clone(&self.store),
            Arc::clone(&self.chat),
            Arc::clone(&self.sessions),
        ));

        Ok(ProposalHandle { proposal_id, task })
    }
}

/// Single-owner session task: the only thread of control that ever touches
/// this session's counters or state.
async fn run_session(
    mut session: VoteSession,
    mut receiver: broadcast::Receiver<ReactionEvent>,
    window: Duration,
    store: Arc<dyn EventStore>,
    chat: Arc<dyn ChatPort>,
    sessions: Arc<SessionRegistry>,
) -> Option<VoteOutcome> {
    let proposal_id = session.proposal_id();
    let self_user = chat.self_user();

    let sleep = tokio::time::sleep(window);
    tokio::pin!(sleep);

    let outcome = loop {
        tokio::select! {
            () = &mut sleep => {
                let _ = session.resolve(SessionState::TimedOut);
                break VoteOutcome::TimedOut;
            }
            received = receiver.recv() => match received {
                Ok(event) => {
                    if !session.qualifies(&event, self_user) {
                        continue;
                    }
                    match session.apply(&event) {
                        Decision::Undecided => {}
                        Decision::Pass => {
                            let _ = session.resolve(SessionState::Passed);
                            break persist_passed(&session, store.as_ref()).await;
                        }
                        Decision::Fail => {
                            let _ = session.resolve(SessionState::Failed);
                            break VoteOutcome::Failed;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(%proposal_id, missed, "reaction stream lagged; continuing");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    // Shutdown: in-flight sessions are lost, not flushed.
                    tracing::debug!(%proposal_id, "reaction bus closed; abandoning session");
                    let _ = sessions.remove(proposal_id).await;
                    return None;
                }
            }
        }
    };

    // Stop listening before reporting; late reactions are nobody's concern
    // once the state is terminal.
    drop(receiver);
    let _ = sessions.remove(proposal_id).await;

    let (upvotes, downvotes) = session.counts();
    tracing::info!(
        %proposal_id,
        upvotes,
        downvotes,
        state = ?session.state(),
        "vote session resolved"
    );

    let text = render_outcome(&outcome, session.candidate());
    if let Err(err) = chat.notify(proposal_id, &text).await {
        tracing::error!(%proposal_id, error = %err, "outcome notification failed");
    }

    Some(outcome)
}

/// Pass path: persist the candidate. A write failure leaves the session
/// Passed; the failure is reported, never retried.
async fn persist_passed(session: &VoteSession, store: &dyn EventStore) -> VoteOutcome {
    match store.insert_event(session.candidate()).await {
        Ok(event_id) => VoteOutcome::Passed {
            event_id: Some(event_id),
        },
        Err(err) => {
            tracing::error!(
                proposal_id = %session.proposal_id(),
                error = %err,
                "passed proposal could not be persisted"
            );
            VoteOutcome::Passed { event_id: None }
        }
    }
}

/// Renders the single user-facing outcome line for a resolved session.
fn render_outcome(outcome: &VoteOutcome, candidate: &GameProposal) -> String {
    match outcome {
        VoteOutcome::Passed {
            event_id: Some(event_id),
        } => format!(
            "The vote passed! {} is booked as event #{event_id}.",
            candidate.describe()
        ),
        VoteOutcome::Passed { event_id: None } => format!(
            "The vote passed, but saving {} failed; it was not stored.",
            candidate.describe()
        ),
        VoteOutcome::Failed => {
            format!("The vote failed; {} will not happen.", candidate.describe())
        }
        VoteOutcome::TimedOut => format!(
            "Voting on {} closed with no decision; the proposal is dropped.",
            candidate.describe()
        ),
    }
}
