//! In-memory vote counters for a single proposal.

use super::{UserId, VoteDirection};

/// Result of evaluating the tally against its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Neither threshold reached; keep listening.
    Undecided,
    /// Up-votes reached the pass threshold.
    Pass,
    /// Down-votes reached the fail threshold.
    Fail,
}

/// Counter state for one vote session.
///
/// Every qualifying reaction event is counted; a voter reacting repeatedly
/// contributes repeatedly. Per-voter de-duplication was considered and
/// deliberately not implemented (see DESIGN.md); the voter identity still
/// flows through [`VoteTally::record`] so the bot's own reactions can be
/// excluded and a de-duplicating variant would be a local change.
#[derive(Debug, Clone)]
pub struct VoteTally {
    upvotes: u32,
    downvotes: u32,
    pass_threshold: u32,
    fail_threshold: u32,
    self_user: UserId,
}

impl VoteTally {
    /// Creates a tally with fixed thresholds. `self_user` is the bot's own
    /// identity, always excluded from counting.
    #[must_use]
    pub const fn new(pass_threshold: u32, fail_threshold: u32, self_user: UserId) -> Self {
        Self {
            upvotes: 0,
            downvotes: 0,
            pass_threshold,
            fail_threshold,
            self_user,
        }
    }

    /// Records one vote in the given direction, unless the voter is the
    /// bot itself.
    pub fn record(&mut self, direction: VoteDirection, voter: UserId) {
        if voter == self.self_user {
            return;
        }
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
    }

    /// Evaluates the thresholds. Pass is checked before Fail, so when both
    /// thresholds are satisfied at the same update, Pass wins.
    #[must_use]
    pub const fn decision(&self) -> Decision {
        if self.upvotes >= self.pass_threshold {
            Decision::Pass
        } else if self.downvotes >= self.fail_threshold {
            Decision::Fail
        } else {
            Decision::Undecided
        }
    }

    /// Current up-vote count.
    #[must_use]
    pub const fn upvotes(&self) -> u32 {
        self.upvotes
    }

    /// Current down-vote count.
    #[must_use]
    pub const fn downvotes(&self) -> u32 {
        self.downvotes
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const BOT: UserId = UserId::new(1);
    const ALICE: UserId = UserId::new(10);
    const BOB: UserId = UserId::new(11);

    #[test]
    fn empty_tally_is_undecided() {
        let tally = VoteTally::new(2, 1, BOT);
        assert_eq!(tally.decision(), Decision::Undecided);
    }

    #[test]
    fn pass_at_threshold() {
        let mut tally = VoteTally::new(2, 1, BOT);
        tally.record(VoteDirection::Up, ALICE);
        assert_eq!(tally.decision(), Decision::Undecided);
        tally.record(VoteDirection::Up, BOB);
        assert_eq!(tally.decision(), Decision::Pass);
    }

    #[test]
    fn fail_at_threshold() {
        let mut tally = VoteTally::new(2, 1, BOT);
        tally.record(VoteDirection::Up, ALICE);
        tally.record(VoteDirection::Down, BOB);
        assert_eq!(tally.decision(), Decision::Fail);
    }

    #[test]
    fn pass_is_checked_before_fail() {
        let mut tally = VoteTally::new(1, 1, BOT);
        tally.record(VoteDirection::Down, ALICE);
        tally.record(VoteDirection::Up, BOB);
        // Both thresholds satisfied; the up-vote threshold wins.
        assert_eq!(tally.decision(), Decision::Pass);
    }

    #[test]
    fn bot_identity_is_never_counted() {
        let mut tally = VoteTally::new(1, 1, BOT);
        tally.record(VoteDirection::Up, BOT);
        tally.record(VoteDirection::Down, BOT);
        assert_eq!(tally.upvotes(), 0);
        assert_eq!(tally.downvotes(), 0);
        assert_eq!(tally.decision(), Decision::Undecided);
    }

    #[test]
    fn repeated_voter_counts_every_time() {
        // Documented choice: no per-voter de-duplication.
        let mut tally = VoteTally::new(2, 1, BOT);
        tally.record(VoteDirection::Up, ALICE);
        tally.record(VoteDirection::Up, ALICE);
        assert_eq!(tally.upvotes(), 2);
        assert_eq!(tally.decision(), Decision::Pass);
    }
}
