//! System card: controller-wide sensors plus the rain delay and pause dialogs.

use ospi_domain::card::{SYSTEM_SENSORS, SystemCardConfig, SystemView, delay_target};
use ospi_domain::error::{OspiError, ValidationError};
use ospi_domain::id::CallId;
use ospi_domain::input::{DelayInput, DelayKind};
use ospi_domain::service::ServiceCall;
use ospi_domain::snapshot::Snapshot;
use ospi_domain::time::Timestamp;

use super::{DialogPrompt, dispatch};
use crate::ports::ServiceCaller;
use crate::watch::WatchGate;

/// Controller of one system card.
pub struct SystemCard<S> {
    caller: S,
    config: Option<SystemCardConfig>,
    gate: WatchGate,
    view: Option<SystemView>,
}

impl<S: ServiceCaller> SystemCard<S> {
    pub fn new(caller: S) -> Self {
        Self {
            caller,
            config: None,
            gate: WatchGate::new(),
            view: None,
        }
    }

    /// Accept the configuration from the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingConfiguration`] when `config` is absent.
    pub fn set_config(&mut self, config: Option<SystemCardConfig>) -> Result<(), OspiError> {
        let config = SystemCardConfig::set(config)?;
        tracing::debug!(device = ?config.device, "system card configured");
        self.config = Some(config);
        self.gate.config_changed();
        self.view = None;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> Option<&SystemCardConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn view(&self) -> Option<&SystemView> {
        self.view.as_ref()
    }

    /// Feed a new snapshot. Returns whether the view was re-derived.
    ///
    /// The end-time sensors are watched too, so a changed deadline updates
    /// the "Ends …" text.
    pub fn update(&mut self, snapshot: &Snapshot, now: Timestamp) -> bool {
        let Some(config) = self.config.as_ref() else {
            return false;
        };
        let watched = SYSTEM_SENSORS
            .into_iter()
            .chain([DelayKind::Rain, DelayKind::Pause].map(delay_target));
        if !self.gate.should_update(snapshot, watched) {
            return false;
        }

        let view = SystemView::derive(config, snapshot, now);
        tracing::debug!(items = view.items.len(), "system card rendered");
        self.view = Some(view);
        true
    }

    /// What the delay dialog of `kind` shows when opened.
    #[must_use]
    pub fn delay_dialog(kind: DelayKind) -> DialogPrompt {
        DialogPrompt {
            title: kind.title().to_string(),
            label: kind.label(),
            initial: "0".to_string(),
        }
    }

    /// Submit a delay dialog.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDelay`] for invalid input (no call is
    /// made), [`ValidationError::MissingConfiguration`] before configuration,
    /// or the host's error.
    pub async fn submit_delay(&self, kind: DelayKind, raw: &str) -> Result<CallId, OspiError> {
        if self.config.is_none() {
            return Err(ValidationError::MissingConfiguration.into());
        }
        let delay = DelayInput::parse(kind, raw)?;
        dispatch(&self.caller, ServiceCall::from_delay(delay_target(kind), delay)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ospi_domain::entity::Entity;
    use ospi_domain::service::{Service, ServiceData};
    use std::future::Future;
    use std::sync::Mutex;

    const DEVICE: &str = "os-1";

    #[derive(Default)]
    struct RecordingCaller {
        calls: Mutex<Vec<ServiceCall>>,
    }

    impl ServiceCaller for RecordingCaller {
        fn call_service(
            &self,
            call: ServiceCall,
        ) -> impl Future<Output = Result<(), OspiError>> + Send {
            self.calls.lock().unwrap().push(call);
            async { Ok(()) }
        }
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn sensor(entity_id: &str, state: &str) -> Entity {
        Entity::builder()
            .entity_id(entity_id)
            .state(state)
            .build()
            .unwrap()
    }

    fn snapshot(stop_time: &str) -> Snapshot {
        Snapshot::new()
            .with_entity(DEVICE, sensor("binary_sensor.opensprinkler_rain_delay_active", "on"))
            .with_entity(DEVICE, sensor("sensor.opensprinkler_rain_delay_stop_time", stop_time))
            .with_entity(DEVICE, sensor("sensor.unrelated", "1"))
    }

    fn card() -> SystemCard<RecordingCaller> {
        let mut card = SystemCard::new(RecordingCaller::default());
        card.set_config(Some(SystemCardConfig {
            device: Some(DEVICE.to_string()),
            ..SystemCardConfig::default()
        }))
        .unwrap();
        card
    }

    #[test]
    fn should_rerender_when_end_time_changes() {
        let mut card = card();
        assert!(card.update(&snapshot("2024-06-01T12:00:00+00:00"), now()));
        assert_eq!(card.view().unwrap().items[0].value, "Ends in 2 hours");

        assert!(!card.update(&snapshot("2024-06-01T12:00:00+00:00"), now()));
        assert!(card.update(&snapshot("2024-06-01T15:00:00+00:00"), now()));
        assert_eq!(card.view().unwrap().items[0].value, "Ends in 5 hours");
    }

    #[test]
    fn should_ignore_unwatched_changes() {
        let mut card = card();
        card.update(&snapshot("2024-06-01T12:00:00+00:00"), now());
        let next = snapshot("2024-06-01T12:00:00+00:00")
            .with_entity(DEVICE, sensor("sensor.unrelated", "2"));
        assert!(!card.update(&next, now()));
    }

    #[tokio::test]
    async fn should_set_rain_delay_in_hours() {
        let card = card();
        card.submit_delay(DelayKind::Rain, "24").await.unwrap();

        let calls = card.caller.calls.lock().unwrap();
        assert_eq!(calls[0].service, Service::SetRainDelay);
        assert_eq!(calls[0].entity_id, "sensor.opensprinkler_rain_delay_stop_time");
        assert_eq!(calls[0].data, ServiceData::SetRainDelay { rain_delay: 24 });
    }

    #[tokio::test]
    async fn should_pause_stations_in_seconds() {
        let card = card();
        card.submit_delay(DelayKind::Pause, "600").await.unwrap();

        let calls = card.caller.calls.lock().unwrap();
        assert_eq!(calls[0].service, Service::PauseStations);
        assert_eq!(calls[0].entity_id, "sensor.opensprinkler_pause_end_time");
        assert_eq!(calls[0].data, ServiceData::PauseStations { pause_duration: 600 });
    }

    #[tokio::test]
    async fn should_not_call_service_for_invalid_delay() {
        let card = card();
        let err = card.submit_delay(DelayKind::Pause, "-1").await.unwrap_err();
        assert!(matches!(
            err,
            OspiError::Validation(ValidationError::InvalidDelay { unit: "seconds" })
        ));
        assert!(card.caller.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn should_open_delay_dialog_at_zero() {
        let prompt = SystemCard::<RecordingCaller>::delay_dialog(DelayKind::Rain);
        assert_eq!(prompt.title, "Rain Delay");
        assert_eq!(prompt.label, "Enter delay in hours");
        assert_eq!(prompt.initial, "0");
    }
}
