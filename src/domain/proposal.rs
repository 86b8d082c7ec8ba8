//! Candidate event payload submitted for a vote.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// An unsaved candidate event.
///
/// Carries only normalized calendar values; raw user text never gets this
/// far. Persisted by the store gateway if and only if the owning vote
/// session resolves to Passed (or the no-vote creation command is used).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProposal {
    /// Free-form game category (e.g. `"dnd"`).
    pub game_type: String,
    /// Proposed session date, local wall-clock frame.
    pub game_date: NaiveDate,
    /// Proposed session time-of-day, minute precision.
    pub game_time: NaiveTime,
}

impl GameProposal {
    /// Creates a proposal from already-normalized values.
    #[must_use]
    pub fn new(game_type: impl Into<String>, game_date: NaiveDate, game_time: NaiveTime) -> Self {
        Self {
            game_type: game_type.into(),
            game_date,
            game_time,
        }
    }

    /// One-line rendering used in published messages and notifications.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} on {} at {}",
            self.game_type,
            self.game_date.format("%d-%m-%Y"),
            self.game_time.format("%H:%M")
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn describe_uses_user_facing_formats() {
        let proposal = GameProposal::new(
            "dnd",
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap_or_default(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        );
        assert_eq!(proposal.describe(), "dnd on 07-03-2026 at 18:00");
    }
}
