//! Date/time normalizer for user-supplied schedule text.
//!
//! Users type dates as `DD-MM-YYYY` and times as `HH:MM`. Parsing produces
//! canonical [`NaiveDate`]/[`NaiveTime`] values or a [`BotError::Format`];
//! raw locale strings never reach the store.
//!
//! No timezone handling: values are stored and compared in the
//! deployment's local wall-clock frame. Stated limitation, not a bug.

use chrono::{NaiveDate, NaiveTime};

use crate::error::BotError;

/// Date pattern accepted from users: day-month-year, `-` separated.
const DATE_FORMAT: &str = "%d-%m-%Y";

/// Time pattern accepted from users: hour:minute, 24h clock. Seconds are
/// always zero and never accepted from the caller; a supplied seconds
/// field fails the parse rather than being dropped.
const TIME_FORMAT: &str = "%H:%M";

/// Parses a date/time pair into canonical calendar values.
///
/// Incidental surrounding whitespace is trimmed. Impossible calendar
/// values (e.g. day 31 of a 30-day month) are rejected.
///
/// # Errors
///
/// Returns [`BotError::Format`] when either half does not match its
/// expected pattern.
pub fn parse(date_text: &str, time_text: &str) -> Result<(NaiveDate, NaiveTime), BotError> {
    let date = parse_date(date_text)?;
    let time = parse_time(time_text)?;
    Ok((date, time))
}

/// Parses a `DD-MM-YYYY` date string.
///
/// # Errors
///
/// Returns [`BotError::Format`] on pattern mismatch or an impossible date.
pub fn parse_date(date_text: &str) -> Result<NaiveDate, BotError> {
    let trimmed = date_text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| BotError::Format(format!("date '{trimmed}' is not DD-MM-YYYY")))
}

/// Parses an `HH:MM` time string. Seconds default to zero.
///
/// # Errors
///
/// Returns [`BotError::Format`] on pattern mismatch, including when a
/// seconds field is supplied.
pub fn parse_time(time_text: &str) -> Result<NaiveTime, BotError> {
    let trimmed = time_text.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .map_err(|_| BotError::Format(format!("time '{trimmed}' is not HH:MM")))
}
