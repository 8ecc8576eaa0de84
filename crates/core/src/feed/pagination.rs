//! Continuation-token pagination over the change log.
//!
//! A token names the last change a client has seen as `"{change_id},{time}"`
//! with the time in ISO-8601. The next page holds the changes strictly after
//! that position in canonical order (`time DESC, change_id ASC`):
//!
//! ```text
//! time < token.time OR (time = token.time AND change_id > token.change_id)
//! ```
//!
//! Because `change_id` is unique, this skips nothing and repeats nothing even
//! when many changes share one timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::CoreError;
use crate::feed::model::DocumentChange;
use crate::types::{DbId, Timestamp};

/// Format a change time the way it appears in tokens and feed entries.
pub fn format_time(time: &Timestamp) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Position in the feed from which the next page resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub change_id: DbId,
    pub time: Timestamp,
}

impl FeedCursor {
    /// Cursor positioned on the given change.
    pub fn after(change: &DocumentChange) -> Self {
        Self {
            change_id: change.change_id,
            time: change.time,
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a token, failing with [`CoreError::InvalidToken`].
    pub fn decode(token: &str) -> Result<Self, CoreError> {
        let (id, time) = token
            .split_once(',')
            .ok_or_else(|| CoreError::InvalidToken(format!("missing separator in '{token}'")))?;

        let change_id = id
            .trim()
            .parse::<DbId>()
            .map_err(|_| CoreError::InvalidToken(format!("invalid change id '{id}'")))?;

        let time = parse_token_time(time.trim())
            .ok_or_else(|| CoreError::InvalidToken(format!("invalid time '{time}'")))?;

        Ok(Self { change_id, time })
    }

    /// Whether a change lies strictly after this cursor in canonical order.
    pub fn admits(&self, change: &DocumentChange) -> bool {
        change.time < self.time || (change.time == self.time && change.change_id > self.change_id)
    }
}

impl fmt::Display for FeedCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.change_id, format_time(&self.time))
    }
}

impl FromStr for FeedCursor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedCursor::decode(s)
    }
}

/// Parse the time half of a token.
///
/// Accepts RFC 3339 and offset-less ISO-8601 (read as UTC). A space where the
/// offset sign should be is read as `+`, since an unescaped `+` in a query
/// string arrives as a space.
fn parse_token_time(raw: &str) -> Option<Timestamp> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }

    if let Some(pos) = raw.rfind(' ') {
        let repaired = format!("{}+{}", &raw[..pos], &raw[pos + 1..]);
        if let Ok(t) = DateTime::parse_from_rfc3339(&repaired) {
            return Some(t.with_timezone(&Utc));
        }
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
