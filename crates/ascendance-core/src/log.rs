//! The in-game event log.
//!
//! A bounded ring buffer held inside [`GameState::logs`], newest entry first.
//! Once [`LOG_CAPACITY`] entries exist, writing a new one drops the oldest.

use ascendance_types::{GameState, LOG_CAPACITY, LogEntry, LogEntryId, LogKind};
use chrono::{DateTime, Utc};

/// Append a log entry to the front of the log, evicting the oldest entries
/// beyond capacity.
pub fn record(state: &mut GameState, kind: LogKind, message: impl Into<String>, now: DateTime<Utc>) {
    let entry = LogEntry {
        id: LogEntryId::new(),
        message: message.into(),
        timestamp: now,
        kind,
    };
    state.logs.insert(0, entry);
    state.logs.truncate(LOG_CAPACITY);
}

/// The most recent entry, if any.
pub fn latest(state: &GameState) -> Option<&LogEntry> {
    state.logs.first()
}
