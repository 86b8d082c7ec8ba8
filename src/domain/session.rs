//! A single in-flight vote session and its terminal state machine.
//!
//! `Open -> {Passed, Failed, TimedOut}`; the transition out of Open
//! happens exactly once and is irreversible. A session is owned by exactly
//! one task for its whole lifetime, so counter updates and the terminal
//! check-and-set never race.

use chrono::{DateTime, Utc};

use super::tally::{Decision, VoteTally};
use super::{GameProposal, ProposalId, ReactionEvent, UserId};

/// Lifecycle state of a vote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Collecting reactions.
    Open,
    /// Up-vote threshold reached; candidate persisted (or persist attempted).
    Passed,
    /// Down-vote threshold reached; candidate discarded.
    Failed,
    /// Deadline elapsed without a decision; candidate discarded.
    TimedOut,
}

impl SessionState {
    /// Returns `true` once the session has left Open.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

/// Terminal outcome reported for a resolved session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The proposal passed. `event_id` is `None` when the store write
    /// failed; the session stays Passed either way (Passed-but-unsaved is
    /// reported, not retried).
    Passed {
        /// Store id of the persisted event, if the write succeeded.
        event_id: Option<i32>,
    },
    /// The proposal was voted down; nothing persisted.
    Failed,
    /// The voting window elapsed undecided; nothing persisted.
    TimedOut,
}

/// One in-flight proposal: candidate payload, counters, deadline, state.
///
/// Ephemeral and in-memory only; evicted once terminal and reported.
#[derive(Debug)]
pub struct VoteSession {
    proposal_id: ProposalId,
    candidate: GameProposal,
    tally: VoteTally,
    deadline: DateTime<Utc>,
    state: SessionState,
}

impl VoteSession {
    /// Creates a session in state Open.
    #[must_use]
    pub const fn new(
        proposal_id: ProposalId,
        candidate: GameProposal,
        tally: VoteTally,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            proposal_id,
            candidate,
            tally,
            deadline,
            state: SessionState::Open,
        }
    }

    /// The published message identity this session is scoped to.
    #[must_use]
    pub const fn proposal_id(&self) -> ProposalId {
        self.proposal_id
    }

    /// The unsaved candidate payload.
    #[must_use]
    pub const fn candidate(&self) -> &GameProposal {
        &self.candidate
    }

    /// Absolute deadline of the voting window.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Current counters, for logging.
    #[must_use]
    pub const fn counts(&self) -> (u32, u32) {
        (self.tally.upvotes(), self.tally.downvotes())
    }

    /// Whether a reaction event qualifies for this session: it must be on
    /// this session's published message, carry one of the two recognized
    /// vote symbols, and not come from the bot itself.
    #[must_use]
    pub fn qualifies(&self, event: &ReactionEvent, self_user: UserId) -> bool {
        event.message_id == self.proposal_id
            && event.user_id != self_user
            && event.vote_symbol().is_some()
    }

    /// Applies a qualifying reaction and re-evaluates the thresholds.
    ///
    /// A reaction applied to an already-terminal session is a no-op and
    /// reports the standing decision unchanged.
    pub fn apply(&mut self, event: &ReactionEvent) -> Decision {
        if self.state.is_terminal() {
            return self.tally.decision();
        }
        if let Some(symbol) = event.vote_symbol() {
            self.tally.record(symbol.direction(), event.user_id);
        }
        self.tally.decision()
    }

    /// Single-shot transition out of Open.
    ///
    /// Returns `true` if the transition happened; `false` (state
    /// unchanged) when the session was already terminal or `next` is Open.
    pub fn resolve(&mut self, next: SessionState) -> bool {
        if self.state.is_terminal() || !next.is_terminal() {
            return false;
        }
        self.state = next;
        true
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    const BOT: UserId = UserId::new(1);

    fn make_session(pass: u32, fail: u32) -> VoteSession {
        let candidate = GameProposal::new(
            "dnd",
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap_or_default(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        );
        VoteSession::new(
            ProposalId::new(100),
            candidate,
            VoteTally::new(pass, fail, BOT),
            Utc::now() + chrono::Duration::hours(1),
        )
    }

    fn upvote(from: u64) -> ReactionEvent {
        ReactionEvent::new(ProposalId::new(100), UserId::new(from), "👍")
    }

    #[test]
    fn new_session_is_open() {
        let session = make_session(2, 1);
        assert_eq!(session.state(), SessionState::Open);
        assert!(!session.state().is_terminal());
    }

    #[test]
    fn qualifies_requires_matching_message() {
        let session = make_session(2, 1);
        let other = ReactionEvent::new(ProposalId::new(999), UserId::new(5), "👍");
        assert!(!session.qualifies(&other, BOT));
        assert!(session.qualifies(&upvote(5), BOT));
    }

    #[test]
    fn qualifies_rejects_bot_and_non_vote_emoji() {
        let session = make_session(2, 1);
        let from_bot = ReactionEvent::new(ProposalId::new(100), BOT, "👍");
        assert!(!session.qualifies(&from_bot, BOT));

        let party = ReactionEvent::new(ProposalId::new(100), UserId::new(5), "🎉");
        assert!(!session.qualifies(&party, BOT));
    }

    #[test]
    fn apply_reaches_pass_at_threshold() {
        let mut session = make_session(2, 1);
        assert_eq!(session.apply(&upvote(5)), Decision::Undecided);
        assert_eq!(session.apply(&upvote(6)), Decision::Pass);
        assert_eq!(session.counts(), (2, 0));
    }

    #[test]
    fn resolve_transitions_exactly_once() {
        let mut session = make_session(2, 1);
        assert!(session.resolve(SessionState::Failed));
        assert_eq!(session.state(), SessionState::Failed);

        // Terminal states are immutable.
        assert!(!session.resolve(SessionState::Passed));
        assert!(!session.resolve(SessionState::TimedOut));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[test]
    fn resolve_to_open_is_rejected() {
        let mut session = make_session(2, 1);
        assert!(!session.resolve(SessionState::Open));
        assert_eq!(session.state(), SessionState::Open);
    }

    #[test]
    fn reactions_after_terminal_state_change_nothing() {
        let mut session = make_session(2, 1);
        let _ = session.apply(&upvote(5));
        let _ = session.apply(&upvote(6));
        assert!(session.resolve(SessionState::Passed));

        let decision = session.apply(&upvote(7));
        assert_eq!(decision, Decision::Pass);
        assert_eq!(session.counts(), (2, 0));
        assert_eq!(session.state(), SessionState::Passed);
    }
}
