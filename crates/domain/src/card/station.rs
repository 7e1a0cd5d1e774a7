//! Station card view.

use std::fmt;

use chrono::TimeDelta;
use serde::Serialize;

use super::config::StationCardConfig;
use crate::classify::tag;
use crate::entity::Entity;
use crate::lifecycle::Lifecycle;
use crate::naming::display_name;
use crate::snapshot::{DeviceGroup, Snapshot};
use crate::status::{is_enabled, peer_key, remaining};
use crate::time::Timestamp;

/// Headline status of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationStatus {
    Running,
    Idle,
    Disabled,
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "Running",
            Self::Idle => "Idle",
            Self::Disabled => "Disabled",
        })
    }
}

/// Button offered next to the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationAction {
    Run,
    Stop,
}

/// Everything the station card shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationView {
    /// Card title, only when `showName` is set.
    pub title: Option<String>,
    pub station_id: String,
    pub station_name: String,
    pub enabled: bool,
    pub status: StationStatus,
    pub icon: String,
    /// `None` while the station is disabled.
    pub action: Option<StationAction>,
    /// Countdown of the current run.
    pub remaining: Option<TimeDelta>,
    /// "Last run: …" text; filled in once history is available.
    pub last_run: String,
}

fn station_device<'a>(config: &'a StationCardConfig, snapshot: &'a Snapshot) -> Option<&'a str> {
    config.device.as_deref().or_else(|| {
        let station = config.station.as_deref()?;
        snapshot
            .registry_entry(station)
            .and_then(|entry| entry.device_id.as_deref())
    })
}

/// Device group of the configured station: the configured device, or the
/// station's own registry device when none is set.
#[must_use]
pub fn station_group<'a>(config: &'a StationCardConfig, snapshot: &'a Snapshot) -> DeviceGroup<'a> {
    station_device(config, snapshot)
        .map_or_else(DeviceGroup::default, |device| snapshot.device_group(device))
}

impl StationView {
    /// Derive the view; `None` when no station is configured or the host
    /// has no state for it.
    #[must_use]
    pub fn derive(config: &StationCardConfig, snapshot: &Snapshot, now: Timestamp) -> Option<Self> {
        let station_id = config.station.as_deref()?;
        let station = snapshot.state(station_id)?;
        let group = station_group(config, snapshot);

        let enabled = is_enabled(&group, station);
        let lifecycle = Lifecycle::of(station);
        let activated = lifecycle == Lifecycle::Active;
        let status = if activated {
            StationStatus::Running
        } else if enabled {
            StationStatus::Idle
        } else {
            StationStatus::Disabled
        };
        let icon = if !enabled {
            &config.icons.idle_disabled
        } else if activated {
            &config.icons.active
        } else {
            &config.icons.idle
        };
        let action = match (enabled, lifecycle.is_stoppable()) {
            (false, _) => None,
            (true, true) => Some(StationAction::Stop),
            (true, false) => Some(StationAction::Run),
        };

        Some(Self {
            title: config.show_name.then(|| config.name.clone()),
            station_id: station.entity_id.clone(),
            station_name: display_name(station),
            enabled,
            status,
            icon: icon.clone(),
            action,
            remaining: remaining(station, now),
            last_run: String::new(),
        })
    }
}

/// The `binary_sensor.` running flag whose history records the station's runs.
#[must_use]
pub fn history_source<'a>(config: &'a StationCardConfig, snapshot: &'a Snapshot) -> Option<&'a Entity> {
    let station_id = config.station.as_deref()?;
    let station_peer = peer_key(snapshot.state(station_id)?);
    snapshot
        .entities(station_device(config, snapshot), move |_, state| {
            state.entity_id.starts_with("binary_sensor.")
                && state.role_tag() == Some(tag::STATION)
                && station_peer.is_some()
                && peer_key(state) == station_peer
        })
        .map(|(_, state)| state)
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::attr;
    use chrono::{TimeZone, Utc};

    const DEVICE: &str = "os-1";
    const STATION: &str = "sensor.front_lawn_station_status";

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn station(state: &str) -> Entity {
        Entity::builder()
            .entity_id(STATION)
            .state(state)
            .role_tag("station")
            .peer_index(0)
            .friendly_name("OpenSprinkler Front Lawn Station Status")
            .build()
            .unwrap()
    }

    fn switch(state: &str) -> Entity {
        Entity::builder()
            .entity_id("switch.front_lawn_station_enabled")
            .state(state)
            .role_tag("station")
            .peer_index(0)
            .build()
            .unwrap()
    }

    fn config() -> StationCardConfig {
        StationCardConfig {
            name: "Lawn".to_string(),
            show_name: true,
            device: Some(DEVICE.to_string()),
            station: Some(STATION.to_string()),
            ..StationCardConfig::default()
        }
    }

    fn snapshot(station_state: &str, switch_state: &str) -> Snapshot {
        Snapshot::new()
            .with_entity(DEVICE, station(station_state))
            .with_entity(DEVICE, switch(switch_state))
    }

    #[test]
    fn should_show_idle_with_run_action_when_enabled() {
        let view = StationView::derive(&config(), &snapshot("idle", "on"), now()).unwrap();
        assert_eq!(view.status, StationStatus::Idle);
        assert_eq!(view.action, Some(StationAction::Run));
        assert_eq!(view.icon, "mdi:water-outline");
        assert_eq!(view.station_name, "Front Lawn");
        assert_eq!(view.title.as_deref(), Some("Lawn"));
    }

    #[test]
    fn should_show_running_with_stop_action() {
        let view = StationView::derive(&config(), &snapshot("manual", "on"), now()).unwrap();
        assert_eq!(view.status, StationStatus::Running);
        assert_eq!(view.action, Some(StationAction::Stop));
        assert_eq!(view.icon, "mdi:water");
    }

    #[test]
    fn should_offer_stop_while_waiting() {
        let view = StationView::derive(&config(), &snapshot("waiting", "on"), now()).unwrap();
        assert_eq!(view.status, StationStatus::Idle);
        assert_eq!(view.action, Some(StationAction::Stop));
    }

    #[test]
    fn should_hide_actions_when_disabled() {
        let view = StationView::derive(&config(), &snapshot("idle", "off"), now()).unwrap();
        assert_eq!(view.status, StationStatus::Disabled);
        assert_eq!(view.action, None);
        assert_eq!(view.icon, "mdi:water-off-outline");
    }

    #[test]
    fn should_report_running_even_when_disabled() {
        let view = StationView::derive(&config(), &snapshot("program", "off"), now()).unwrap();
        assert_eq!(view.status, StationStatus::Running);
        assert_eq!(view.action, None);
    }

    #[test]
    fn should_use_registry_device_when_config_has_none() {
        let mut config = config();
        config.device = None;
        let view = StationView::derive(&config, &snapshot("idle", "on"), now()).unwrap();
        assert!(view.enabled);
    }

    #[test]
    fn should_return_none_when_station_missing() {
        let mut config = config();
        config.station = Some("sensor.nope".to_string());
        assert!(StationView::derive(&config, &snapshot("idle", "on"), now()).is_none());

        config.station = None;
        assert!(StationView::derive(&config, &snapshot("idle", "on"), now()).is_none());
    }

    #[test]
    fn should_expose_remaining_time_of_current_run() {
        let mut running = station("program");
        running.attributes.insert(
            attr::END_TIME.to_string(),
            "2024-06-01T10:15:00+00:00".into(),
        );
        let snapshot = Snapshot::new()
            .with_entity(DEVICE, running)
            .with_entity(DEVICE, switch("on"));

        let view = StationView::derive(&config(), &snapshot, now()).unwrap();
        assert_eq!(view.remaining, Some(TimeDelta::minutes(15)));
    }

    #[test]
    fn should_find_running_flag_as_history_source() {
        let flag = Entity::builder()
            .entity_id("binary_sensor.front_lawn_station_running")
            .role_tag("station")
            .peer_index(0)
            .build()
            .unwrap();
        let other = Entity::builder()
            .entity_id("binary_sensor.back_yard_station_running")
            .role_tag("station")
            .peer_index(1)
            .build()
            .unwrap();
        let snapshot = snapshot("idle", "on")
            .with_entity(DEVICE, other)
            .with_entity(DEVICE, flag);

        assert_eq!(
            history_source(&config(), &snapshot).map(|e| e.entity_id.as_str()),
            Some("binary_sensor.front_lawn_station_running")
        );
    }

    #[test]
    fn should_match_float_peer_index_of_running_flag() {
        let flag = Entity::builder()
            .entity_id("binary_sensor.front_lawn_station_running")
            .role_tag("station")
            .attribute(attr::INDEX, crate::entity::AttributeValue::Float(0.0))
            .build()
            .unwrap();
        let snapshot = snapshot("idle", "on").with_entity(DEVICE, flag);

        assert_eq!(
            history_source(&config(), &snapshot).map(|e| e.entity_id.as_str()),
            Some("binary_sensor.front_lawn_station_running")
        );
    }
}
