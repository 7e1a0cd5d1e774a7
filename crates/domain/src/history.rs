//! Station run history: "Last run: 6/1/24 10:00 AM for 20 minutes".

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::entity::EntityState;
use crate::humanize::humanize;
use crate::time::Timestamp;

/// One on/off record from the host's history API (minimal response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub state: EntityState,
    pub last_changed: Timestamp,
}

/// Host API path listing the state history of `entity_id`.
#[must_use]
pub fn history_path(entity_id: &str) -> String {
    format!("history/period?filter_entity_id={entity_id}&minimal_response=true&no_attributes=true")
}

/// The most recent completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastRun {
    pub start: Timestamp,
    pub stop: Timestamp,
}

impl LastRun {
    /// `"Last run: <M/D/YY h:mm AM> for <duration>"`, start shown at `offset`.
    #[must_use]
    pub fn describe(&self, offset: FixedOffset) -> String {
        let start = self.start.with_timezone(&offset);
        format!(
            "Last run: {} for {}",
            start.format("%-m/%-d/%y %-I:%M %p"),
            humanize(self.stop - self.start)
        )
    }
}

/// Find the latest run in time-ordered `transitions`.
///
/// Scans newest-first; the first `off` record that has a predecessor closes
/// the run, and the predecessor's timestamp opens it.
#[must_use]
pub fn last_run(transitions: &[StateTransition]) -> Option<LastRun> {
    transitions.windows(2).rev().find_map(|pair| match pair {
        [prev, record] if record.state == EntityState::Off => Some(LastRun {
            start: prev.last_changed,
            stop: record.last_changed,
        }),
        _ => None,
    })
}

/// Display text for the station card; blank when no run is on record.
#[must_use]
pub fn last_run_text(transitions: &[StateTransition], offset: FixedOffset) -> String {
    last_run(transitions)
        .map(|run| run.describe(offset))
        .unwrap_or_default()
}
