//! System card view.

use super::config::SystemCardConfig;
use crate::entity::Entity;
use crate::input::DelayKind;
use crate::naming::system_sensor_name;
use crate::snapshot::{DeviceGroup, Snapshot};
use crate::status::{
    has_rain_delay_active, pause_status, rain_delay_status, system_status_entities,
};
use crate::time::Timestamp;

const SENSOR_1: &str = "binary_sensor.opensprinkler_sensor_1_active";
const SENSOR_2: &str = "binary_sensor.opensprinkler_sensor_2_active";
const PAUSED: &str = "binary_sensor.opensprinkler_paused";
const RAIN_DELAY_ACTIVE: &str = "binary_sensor.opensprinkler_rain_delay_active";
const PAUSE_END_TIME: &str = "sensor.opensprinkler_pause_end_time";
const RAIN_DELAY_STOP_TIME: &str = "sensor.opensprinkler_rain_delay_stop_time";

/// Sensors shown by the system card, in display order.
pub const SYSTEM_SENSORS: [&str; 7] = [
    SENSOR_1,
    SENSOR_2,
    "sensor.opensprinkler_current_draw",
    "sensor.opensprinkler_water_level",
    "sensor.opensprinkler_flow_rate",
    PAUSED,
    RAIN_DELAY_ACTIVE,
];

/// Entity a delay service call is addressed to.
#[must_use]
pub fn delay_target(kind: DelayKind) -> &'static str {
    match kind {
        DelayKind::Rain => RAIN_DELAY_STOP_TIME,
        DelayKind::Pause => PAUSE_END_TIME,
    }
}

/// One row of the system card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatusItem {
    pub entity_id: String,
    pub name: String,
    pub value: String,
    /// Delay dialog opened by clicking the row.
    pub action: Option<DelayKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemView {
    pub title: Option<String>,
    /// A rain delay is holding back every station.
    pub rain_delay_active: bool,
    pub items: Vec<SystemStatusItem>,
}

impl SystemView {
    /// Derive the view from the untagged entities of the configured device,
    /// or of every device when none is configured.
    #[must_use]
    pub fn derive(config: &SystemCardConfig, snapshot: &Snapshot, now: Timestamp) -> Self {
        let group = snapshot.group(config.device.as_deref());
        let system = system_status_entities(&group);
        let system_group = DeviceGroup::from_entities(system.values().copied());

        let items = SYSTEM_SENSORS
            .iter()
            .filter(|id| match **id {
                SENSOR_1 => config.show_sensor1,
                SENSOR_2 => config.show_sensor2,
                _ => true,
            })
            .filter_map(|id| system.get(id).copied())
            .filter(|entity| entity.state.is_known())
            .map(|entity| {
                let (action, status) = match entity.entity_id.as_str() {
                    PAUSED => (Some(DelayKind::Pause), pause_status(&system_group, now)),
                    RAIN_DELAY_ACTIVE => (
                        Some(DelayKind::Rain),
                        rain_delay_status(&system_group, now),
                    ),
                    _ => (None, None),
                };
                SystemStatusItem {
                    entity_id: entity.entity_id.clone(),
                    name: item_name(config, entity),
                    value: status.unwrap_or_else(|| with_unit(entity)),
                    action,
                }
            })
            .collect();

        Self {
            title: config.show_name.then(|| config.name.clone()),
            rain_delay_active: has_rain_delay_active(&system_group),
            items,
        }
    }
}

fn item_name(config: &SystemCardConfig, entity: &Entity) -> String {
    let label = match entity.entity_id.as_str() {
        SENSOR_1 => config.sensor1_name.as_deref(),
        SENSOR_2 => config.sensor2_name.as_deref(),
        _ => None,
    };
    label
        .filter(|label| !label.is_empty())
        .map_or_else(|| system_sensor_name(entity), str::to_string)
}

fn with_unit(entity: &Entity) -> String {
    match entity.unit_of_measurement() {
        Some(unit) => format!("{}{unit}", entity.state),
        None => entity.state.to_string(),
    }
}
