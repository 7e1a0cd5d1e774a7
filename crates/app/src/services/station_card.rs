//! Station card: status of one station with run/stop actions and its last run.

use chrono::{FixedOffset, TimeDelta};

use ospi_domain::card::{StationCardConfig, StationView, history_source, station_group};
use ospi_domain::error::{OspiError, ValidationError};
use ospi_domain::history::last_run_text;
use ospi_domain::id::CallId;
use ospi_domain::input::{DEFAULT_RUNTIME_MINUTES, RunDuration};
use ospi_domain::service::ServiceCall;
use ospi_domain::snapshot::Snapshot;
use ospi_domain::status::EnableIndex;
use ospi_domain::time::Timestamp;

use super::{DialogPrompt, dispatch};
use crate::ports::{HistoryApi, ServiceCaller};
use crate::watch::WatchGate;

/// Delay between the end of a run and the history lookup.
const HISTORY_REARM_SECONDS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum LastRun {
    Unknown,
    Running,
    Finished { at: Timestamp },
    Known(String),
}

impl LastRun {
    fn text(&self) -> &str {
        match self {
            Self::Known(text) => text,
            Self::Unknown | Self::Running | Self::Finished { .. } => "",
        }
    }
}

/// Controller of one station card.
pub struct StationCard<S, H> {
    caller: S,
    history: H,
    offset: FixedOffset,
    config: Option<StationCardConfig>,
    gate: WatchGate,
    last_run: LastRun,
    view: Option<StationView>,
}

impl<S: ServiceCaller, H: HistoryApi> StationCard<S, H> {
    /// Create a card; "last run" times are shown at `offset`.
    pub fn new(caller: S, history: H, offset: FixedOffset) -> Self {
        Self {
            caller,
            history,
            offset,
            config: None,
            gate: WatchGate::new(),
            last_run: LastRun::Unknown,
            view: None,
        }
    }

    /// Accept the configuration from the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingConfiguration`] when `config` is absent.
    pub fn set_config(&mut self, config: Option<StationCardConfig>) -> Result<(), OspiError> {
        let config = StationCardConfig::set(config)?;
        tracing::debug!(station = ?config.station, "station card configured");
        self.config = Some(config);
        self.gate.config_changed();
        self.last_run = LastRun::Unknown;
        self.view = None;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> Option<&StationCardConfig> {
        self.config.as_ref()
    }

    /// The last derived view; `None` before the first update or while the
    /// station is missing from the snapshot.
    #[must_use]
    pub fn view(&self) -> Option<&StationView> {
        self.view.as_ref()
    }

    /// Feed a new snapshot. Returns whether the view was re-derived.
    pub async fn update(&mut self, snapshot: &Snapshot, now: Timestamp) -> bool {
        let Some(config) = self.config.clone() else {
            return false;
        };

        let watched_changed = self.gate.should_update(snapshot, config.station.as_deref());
        let last_run_changed = self.refresh_last_run(&config, snapshot, now).await;
        if !(watched_changed || last_run_changed) {
            return false;
        }

        let index = EnableIndex::build(&station_group(&config, snapshot));
        for switches in index.conflicts() {
            tracing::warn!(?switches, "enable switches share one peer index");
        }

        self.view = StationView::derive(&config, snapshot, now).map(|mut view| {
            view.last_run = self.last_run.text().to_string();
            view
        });
        if self.view.is_none() {
            tracing::debug!(station = ?config.station, "station not in snapshot");
        }
        true
    }

    async fn refresh_last_run(
        &mut self,
        config: &StationCardConfig,
        snapshot: &Snapshot,
        now: Timestamp,
    ) -> bool {
        let running = config
            .station
            .as_deref()
            .and_then(|id| snapshot.state(id))
            .is_some_and(|station| station.end_time().is_some());

        let next = match (&self.last_run, running) {
            (_, true) => LastRun::Running,
            (LastRun::Running, false) => LastRun::Finished { at: now },
            (LastRun::Finished { at }, false)
                if now - *at >= TimeDelta::seconds(HISTORY_REARM_SECONDS) =>
            {
                LastRun::Unknown
            }
            (current, false) => current.clone(),
        };
        let next = if next == LastRun::Unknown {
            self.fetch_last_run(config, snapshot).await
        } else {
            next
        };

        let changed = next.text() != self.last_run.text();
        self.last_run = next;
        changed
    }

    async fn fetch_last_run(&self, config: &StationCardConfig, snapshot: &Snapshot) -> LastRun {
        let Some(source) = history_source(config, snapshot) else {
            tracing::debug!(station = ?config.station, "no running flag for station history");
            return LastRun::Known(String::new());
        };
        match self.history.history(&source.entity_id).await {
            Ok(transitions) => LastRun::Known(last_run_text(&transitions, self.offset)),
            Err(err) => {
                tracing::warn!(entity_id = %source.entity_id, error = %err, "history fetch failed");
                LastRun::Known(String::new())
            }
        }
    }

    /// What the runtime dialog shows when opened.
    #[must_use]
    pub fn runtime_dialog(&self) -> DialogPrompt {
        DialogPrompt {
            title: "Runtime".to_string(),
            label: "Enter runtime in minutes".to_string(),
            initial: DEFAULT_RUNTIME_MINUTES.to_string(),
        }
    }

    fn station(&self) -> Result<&str, OspiError> {
        self.config
            .as_ref()
            .and_then(|config| config.station.as_deref())
            .ok_or_else(|| ValidationError::MissingConfiguration.into())
    }

    /// Submit the runtime dialog: run the station for `minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RuntimeOutOfRange`] for invalid input (no
    /// call is made), [`ValidationError::MissingConfiguration`] without a
    /// station, or the host's error.
    pub async fn run(&self, minutes: &str) -> Result<CallId, OspiError> {
        let station = self.station()?;
        let duration = RunDuration::from_minutes_input(minutes)?;
        dispatch(&self.caller, ServiceCall::run(station, duration)).await
    }

    /// Stop the station.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingConfiguration`] without a station,
    /// or the host's error.
    pub async fn stop(&self) -> Result<CallId, OspiError> {
        let station = self.station()?;
        dispatch(&self.caller, ServiceCall::stop(station)).await
    }
}
