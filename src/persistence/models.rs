//! Persisted records, query filters, and partial-update patches.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A persisted game event row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store-assigned id (serial).
    pub id: i32,
    /// Free-form game category.
    pub game_type: String,
    /// Session date, local wall-clock frame.
    pub game_date: NaiveDate,
    /// Session time-of-day, minute precision.
    pub game_time: NaiveTime,
    /// Weak reference to an attending player; no ownership, so it is not
    /// rewritten when player ids are resequenced.
    pub attendee_player_id: Option<i32>,
}

/// A registered player row.
///
/// Player ids are kept contiguous (`1..N`): deleting a player resequences
/// the survivors in ascending original order. An explicit store invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Store-assigned contiguous id.
    pub id: i32,
    /// Platform user identifier, unique.
    pub external_user_id: String,
    /// Display name shown in listings.
    pub display_name: String,
}

/// AND-combined filter for event queries. Absent fields do not constrain;
/// a default filter returns all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Match a single event id.
    pub id: Option<i32>,
    /// Match a game category exactly.
    pub game_type: Option<String>,
    /// Match a session date.
    pub game_date: Option<NaiveDate>,
    /// Match a session time.
    pub game_time: Option<NaiveTime>,
}

impl EventFilter {
    /// Returns `true` when no field constrains the query.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.game_type.is_none()
            && self.game_date.is_none()
            && self.game_time.is_none()
    }

    /// Returns `true` when `record` satisfies every present field.
    #[must_use]
    pub fn matches(&self, record: &EventRecord) -> bool {
        self.id.is_none_or(|id| id == record.id)
            && self
                .game_type
                .as_ref()
                .is_none_or(|t| *t == record.game_type)
            && self.game_date.is_none_or(|d| d == record.game_date)
            && self.game_time.is_none_or(|t| t == record.game_time)
    }
}

/// Partial field update for an event. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New game category.
    pub game_type: Option<String>,
    /// New session date.
    pub game_date: Option<NaiveDate>,
    /// New session time.
    pub game_time: Option<NaiveTime>,
    /// New attendee player id.
    pub attendee_player_id: Option<i32>,
}

impl EventPatch {
    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.game_type.is_none()
            && self.game_date.is_none()
            && self.game_time.is_none()
            && self.attendee_player_id.is_none()
    }

    /// Applies the patch to a record in place.
    pub fn apply_to(&self, record: &mut EventRecord) {
        if let Some(game_type) = &self.game_type {
            record.game_type.clone_from(game_type);
        }
        if let Some(game_date) = self.game_date {
            record.game_date = game_date;
        }
        if let Some(game_time) = self.game_time {
            record.game_time = game_time;
        }
        if let Some(attendee) = self.attendee_player_id {
            record.attendee_player_id = Some(attendee);
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_record(id: i32, game_type: &str, day: u32) -> EventRecord {
        EventRecord {
            id,
            game_type: game_type.to_string(),
            game_date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap_or_default(),
            game_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            attendee_player_id: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = EventFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&make_record(1, "dnd", 1)));
        assert!(filter.matches(&make_record(9, "catan", 20)));
    }

    #[test]
    fn multiple_fields_are_and_combined() {
        let filter = EventFilter {
            game_type: Some("dnd".to_string()),
            game_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            ..EventFilter::default()
        };
        assert!(filter.matches(&make_record(1, "dnd", 1)));
        // Right type, wrong date.
        assert!(!filter.matches(&make_record(2, "dnd", 2)));
        // Right date, wrong type.
        assert!(!filter.matches(&make_record(3, "catan", 1)));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut record = make_record(1, "dnd", 1);
        let patch = EventPatch {
            game_type: Some("catan".to_string()),
            attendee_player_id: Some(4),
            ..EventPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut record);

        assert_eq!(record.game_type, "catan");
        assert_eq!(record.attendee_player_id, Some(4));
        // Untouched fields survive.
        assert_eq!(record.game_date, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap_or_default());
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(EventPatch::default().is_empty());
    }
}
