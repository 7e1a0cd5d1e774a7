//! Virtual station: run/stop, enable switch and running flag.

use std::sync::Mutex;

use chrono::TimeDelta;

use ospi_domain::classify::tag;
use ospi_domain::entity::{Entity, EntityState, attr};
use ospi_domain::error::OspiError;
use ospi_domain::status::{MANUAL_PROGRAM_ID, RUN_ONCE_PROGRAM_ID};
use ospi_domain::time::Timestamp;

use super::{lock, slugify};

/// A run in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub program_id: i64,
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug)]
struct StationState {
    enabled: bool,
    run: Option<Run>,
}

/// A simulated station; enabled and idle until told otherwise.
pub struct VirtualStation {
    index: i64,
    name: String,
    slug: String,
    state: Mutex<StationState>,
}

impl VirtualStation {
    #[must_use]
    pub fn new(index: i64, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            slug: slugify(name),
            state: Mutex::new(StationState {
                enabled: true,
                run: None,
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the status sensor the station card is configured with.
    #[must_use]
    pub fn status_entity_id(&self) -> String {
        format!("sensor.{}_station_status", self.slug)
    }

    #[must_use]
    pub fn enable_entity_id(&self) -> String {
        format!("switch.{}_station_enabled", self.slug)
    }

    /// Id of the on/off flag whose history records the runs.
    #[must_use]
    pub fn running_entity_id(&self) -> String {
        format!("binary_sensor.{}_station_running", self.slug)
    }

    #[must_use]
    pub fn run(&self) -> Option<Run> {
        lock(&self.state).run
    }

    pub fn set_enabled(&self, enabled: bool) {
        lock(&self.state).enabled = enabled;
    }

    /// Start (or restart) a run of `duration` driven by `program_id`.
    pub fn start(&self, program_id: i64, now: Timestamp, duration: TimeDelta) {
        lock(&self.state).run = Some(Run {
            program_id,
            start: now,
            end: now + duration,
        });
    }

    /// Stop the current run; returns whether one was in progress.
    pub fn stop(&self) -> bool {
        lock(&self.state).run.take().is_some()
    }

    /// Finish a run whose end has passed; returns the run's end when it did.
    pub fn settle(&self, now: Timestamp) -> Option<Timestamp> {
        let mut state = lock(&self.state);
        let end = state.run.filter(|run| run.end <= now)?.end;
        state.run = None;
        Some(end)
    }

    /// Status sensor, enable switch and running flag, as the host shows them.
    ///
    /// # Errors
    ///
    /// Returns a validation error if an entity builder fails.
    pub fn entities(&self) -> Result<Vec<Entity>, OspiError> {
        let (enabled, run) = {
            let state = lock(&self.state);
            (state.enabled, state.run)
        };

        let mut status = Entity::builder()
            .entity_id(self.status_entity_id())
            .state(run.map_or("idle", |run| status_text(run.program_id)))
            .role_tag(tag::STATION)
            .peer_index(self.index)
            .friendly_name(format!("OpenSprinkler {} Station Status", self.name));
        if let Some(run) = run {
            status = status
                .attribute(attr::RUNNING_PROGRAM_ID, run.program_id)
                .attribute(attr::START_TIME, run.start.to_rfc3339())
                .attribute(attr::END_TIME, run.end.to_rfc3339());
        }

        let switch = Entity::builder()
            .entity_id(self.enable_entity_id())
            .state(on_off(enabled))
            .role_tag(tag::STATION)
            .peer_index(self.index)
            .friendly_name(format!("OpenSprinkler {} Station Enabled", self.name))
            .build()?;

        let running = Entity::builder()
            .entity_id(self.running_entity_id())
            .state(on_off(run.is_some()))
            .role_tag(tag::STATION)
            .peer_index(self.index)
            .friendly_name(format!("OpenSprinkler {} Station Running", self.name))
            .build()?;

        Ok(vec![status.build()?, switch, running])
    }
}

fn status_text(program_id: i64) -> &'static str {
    match program_id {
        MANUAL_PROGRAM_ID => "manual",
        RUN_ONCE_PROGRAM_ID => "once_program",
        _ => "program",
    }
}

pub(crate) fn on_off(on: bool) -> EntityState {
    if on { EntityState::On } else { EntityState::Off }
}
