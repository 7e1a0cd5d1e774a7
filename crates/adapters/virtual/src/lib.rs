//! # ospi-adapter-virtual
//!
//! Virtual OpenSprinkler controller that stands in for the host platform
//! during tests and demonstrations.
//!
//! ## Provided entities
//!
//! | Part | Entity ID | Behaviour |
//! |------|-----------|-----------|
//! | Station | `sensor.<slug>_station_status` | `idle` / `manual` / `program` / `once_program`, with run times |
//! | Station | `switch.<slug>_station_enabled` | Enable toggle of the station |
//! | Station | `binary_sensor.<slug>_station_running` | On while running; history is recorded |
//! | Controller | `switch.opensprinkler_controller_enabled` | Always on |
//! | System | `binary_sensor.opensprinkler_*`, `sensor.opensprinkler_*` | Inputs, current draw, water level, pause, rain delay |
//!
//! Handles the `run`, `stop`, `set_rain_delay` and `pause_stations` services.
//!
//! ## Dependency rule
//!
//! Depends on `ospi-app` (port traits) and `ospi-domain` only.

mod devices;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use chrono::TimeDelta;

use ospi_app::ports::{HistoryApi, ServiceCaller};
use ospi_domain::entity::EntityState;
use ospi_domain::error::{NotFoundError, OspiError};
use ospi_domain::history::StateTransition;
use ospi_domain::service::{Service, ServiceCall, ServiceData};
use ospi_domain::snapshot::Snapshot;
use ospi_domain::status::MANUAL_PROGRAM_ID;
use ospi_domain::time::Timestamp;

pub use devices::{Run, VirtualStation, VirtualSystem};

/// A simulated controller with a fixed set of stations.
///
/// Time only moves when [`snapshot`](Self::snapshot) is called; service
/// calls take effect at the latest snapshot time.
pub struct VirtualController {
    device: String,
    stations: Vec<VirtualStation>,
    system: VirtualSystem,
    clock: Mutex<Timestamp>,
    history: Mutex<HashMap<String, Vec<StateTransition>>>,
}

impl VirtualController {
    /// A controller registered as `device`, with one station per name.
    #[must_use]
    pub fn new<'a>(
        device: &str,
        stations: impl IntoIterator<Item = &'a str>,
        now: Timestamp,
    ) -> Self {
        let stations: Vec<VirtualStation> = stations
            .into_iter()
            .zip(0..)
            .map(|(name, index)| VirtualStation::new(index, name))
            .collect();
        let history = stations
            .iter()
            .map(|station| {
                let initial = StateTransition {
                    state: EntityState::Off,
                    last_changed: now,
                };
                (station.running_entity_id(), vec![initial])
            })
            .collect();
        Self {
            device: device.to_string(),
            stations,
            system: VirtualSystem::default(),
            clock: Mutex::new(now),
            history: Mutex::new(history),
        }
    }

    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    #[must_use]
    pub fn stations(&self) -> &[VirtualStation] {
        &self.stations
    }

    #[must_use]
    pub fn system(&self) -> &VirtualSystem {
        &self.system
    }

    /// Look up a station by its status sensor id.
    ///
    /// # Errors
    ///
    /// Returns [`OspiError::NotFound`] for an unknown id.
    pub fn station(&self, entity_id: &str) -> Result<&VirtualStation, OspiError> {
        self.stations
            .iter()
            .find(|station| station.status_entity_id() == entity_id)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Station",
                    id: entity_id.to_string(),
                }
                .into()
            })
    }

    fn now(&self) -> Timestamp {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, entity_id: String, state: EntityState, at: Timestamp) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let transitions = history.entry(entity_id).or_default();
        if transitions.last().is_some_and(|last| last.state == state) {
            return;
        }
        transitions.push(StateTransition {
            state,
            last_changed: at,
        });
    }

    /// Start a run driven by `program_id` (for example a "run once" program).
    ///
    /// # Errors
    ///
    /// Returns [`OspiError::NotFound`] for an unknown station.
    pub fn start_program(
        &self,
        entity_id: &str,
        program_id: i64,
        duration: TimeDelta,
    ) -> Result<(), OspiError> {
        let station = self.station(entity_id)?;
        let now = self.now();
        station.start(program_id, now, duration);
        self.record(station.running_entity_id(), EntityState::On, now);
        tracing::debug!(entity_id, program_id, "station started");
        Ok(())
    }

    /// Move the clock to `now`, finish expired runs, pauses and delays, and
    /// return what the host would push.
    ///
    /// # Errors
    ///
    /// Returns a validation error if an entity builder fails.
    pub fn snapshot(&self, now: Timestamp) -> Result<Snapshot, OspiError> {
        *self.clock.lock().unwrap_or_else(PoisonError::into_inner) = now;
        for station in &self.stations {
            if let Some(end) = station.settle(now) {
                tracing::debug!(station = station.name(), "run finished");
                self.record(station.running_entity_id(), EntityState::Off, end);
            }
        }
        self.system.settle(now);

        let mut snapshot = Snapshot::new();
        for station in &self.stations {
            for entity in station.entities()? {
                snapshot.insert(Some(self.device.as_str()), entity);
            }
        }
        for entity in self.system.entities()? {
            snapshot.insert(Some(self.device.as_str()), entity);
        }
        Ok(snapshot)
    }

    fn apply(&self, call: &ServiceCall) -> Result<(), OspiError> {
        let now = self.now();
        match (call.service, call.data) {
            (Service::Run, ServiceData::Run { run_seconds }) => self.start_program(
                &call.entity_id,
                MANUAL_PROGRAM_ID,
                TimeDelta::seconds(i64::from(run_seconds)),
            ),
            (Service::Stop, _) => {
                let station = self.station(&call.entity_id)?;
                if station.stop() {
                    self.record(station.running_entity_id(), EntityState::Off, now);
                }
                Ok(())
            }
            (Service::SetRainDelay, ServiceData::SetRainDelay { rain_delay }) => {
                self.system.set_rain_delay(now, rain_delay);
                Ok(())
            }
            (Service::PauseStations, ServiceData::PauseStations { pause_duration }) => {
                self.system.pause(now, pause_duration);
                Ok(())
            }
            (service, _) => Err(OspiError::Host(
                format!("malformed {service} call for {}", call.entity_id).into(),
            )),
        }
    }
}

impl ServiceCaller for VirtualController {
    fn call_service(&self, call: ServiceCall) -> impl Future<Output = Result<(), OspiError>> + Send {
        let result = self.apply(&call);
        if result.is_ok() {
            tracing::info!(
                call_id = %call.id,
                service = %call.service,
                "virtual controller applied call"
            );
        }
        async { result }
    }
}

impl HistoryApi for VirtualController {
    fn history(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Vec<StateTransition>, OspiError>> + Send {
        let transitions = self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(entity_id)
            .cloned()
            .unwrap_or_default();
        async { Ok(transitions) }
    }
}
