//! Bot error types with user-facing message rendering.
//!
//! [`BotError`] is the central error type for the bot core. Each variant
//! maps to a category from the error taxonomy and renders as a single
//! user-facing line via [`BotError::user_message`]. No variant is fatal to
//! the process: one failed command never aborts the listening loop or any
//! other in-flight vote session.

/// Bot-side error enum covering every failure the core can report.
///
/// # Categories
///
/// | Variant | Category | User-correctable |
/// |---------------------|------------------------|------------------|
/// | `Format` | bad date/time input | yes |
/// | `InvalidCommand` | malformed command | yes |
/// | `Connection`/`Store`| storage failure | no (reported) |
/// | `*NotFound` | nonexistent target id | yes |
/// | `AlreadyRegistered` | idempotency guard | yes |
/// | `Chat` | platform delivery | no (reported) |
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Date or time text did not match the expected pattern or encodes an
    /// impossible calendar value.
    #[error("invalid date/time: {0}")]
    Format(String),

    /// Command arguments were structurally invalid (e.g. an edit with no
    /// fields to change).
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The database connection could not be established or acquired.
    #[error("database connection error: {0}")]
    Connection(String),

    /// A statement against the store failed.
    #[error("store error: {0}")]
    Store(String),

    /// No event with the given id exists.
    #[error("event not found: {0}")]
    EventNotFound(i32),

    /// No player with the given id exists.
    #[error("player not found: {0}")]
    PlayerNotFound(i32),

    /// A player with this platform user id is already registered.
    #[error("already registered: {0}")]
    AlreadyRegistered(String),

    /// The chat platform failed to deliver a message or notification.
    #[error("chat delivery error: {0}")]
    Chat(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Renders this error as the single line the command surface sends back
    /// to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Format(detail) => {
                format!("I couldn't read that date/time ({detail}). Expected DD-MM-YYYY and HH:MM.")
            }
            Self::InvalidCommand(detail) => format!("That command isn't valid: {detail}"),
            Self::Connection(_) | Self::Store(_) => {
                "The event store is unavailable right now; nothing was saved.".to_string()
            }
            Self::EventNotFound(id) => format!("No event with id {id}."),
            Self::PlayerNotFound(id) => format!("No player with id {id}."),
            Self::AlreadyRegistered(user) => {
                format!("{user} is already registered.")
            }
            Self::Chat(_) => "I couldn't post that message to the channel.".to_string(),
            Self::Internal(_) => "Something went wrong on my end.".to_string(),
        }
    }

    /// Returns `true` for variants the user can fix by correcting their
    /// input, as opposed to infrastructure failures.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Format(_)
                | Self::InvalidCommand(_)
                | Self::EventNotFound(_)
                | Self::PlayerNotFound(_)
                | Self::AlreadyRegistered(_)
        )
    }
}

impl From<sqlx::Error> for BotError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => Self::Connection(err.to_string()),
            other => Self::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn format_error_message_names_expected_patterns() {
        let err = BotError::Format("day out of range".to_string());
        let msg = err.user_message();
        assert!(msg.contains("DD-MM-YYYY"));
        assert!(msg.contains("day out of range"));
    }

    #[test]
    fn store_errors_are_not_user_correctable() {
        assert!(!BotError::Store("down".to_string()).is_user_correctable());
        assert!(!BotError::Connection("down".to_string()).is_user_correctable());
        assert!(BotError::EventNotFound(7).is_user_correctable());
        assert!(BotError::AlreadyRegistered("u1".to_string()).is_user_correctable());
    }

    #[test]
    fn display_includes_detail() {
        let err = BotError::EventNotFound(42);
        assert_eq!(err.to_string(), "event not found: 42");
    }
}
