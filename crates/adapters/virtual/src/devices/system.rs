//! Controller-wide sensors: inputs, current draw, water level, pause and rain delay.

use std::sync::Mutex;

use chrono::TimeDelta;

use ospi_domain::classify::tag;
use ospi_domain::entity::{Entity, EntityState, attr};
use ospi_domain::error::OspiError;
use ospi_domain::time::Timestamp;

use super::lock;
use super::station::on_off;

const UNKNOWN: &str = "unknown";

#[derive(Debug)]
struct SystemState {
    sensor_1: bool,
    sensor_2: bool,
    current_draw_ma: i64,
    water_level_percent: i64,
    paused_until: Option<Timestamp>,
    rain_delay_until: Option<Timestamp>,
}

/// The controller itself as the host sees it.
pub struct VirtualSystem {
    state: Mutex<SystemState>,
}

impl Default for VirtualSystem {
    fn default() -> Self {
        Self {
            state: Mutex::new(SystemState {
                sensor_1: false,
                sensor_2: false,
                current_draw_ma: 0,
                water_level_percent: 100,
                paused_until: None,
                rain_delay_until: None,
            }),
        }
    }
}

fn until(now: Timestamp, delay: TimeDelta) -> Option<Timestamp> {
    (delay > TimeDelta::zero()).then(|| now + delay)
}

impl VirtualSystem {
    /// Delay watering for `hours`; zero clears the delay.
    pub fn set_rain_delay(&self, now: Timestamp, hours: u32) {
        lock(&self.state).rain_delay_until = until(now, TimeDelta::hours(i64::from(hours)));
    }

    /// Pause all stations for `seconds`; zero resumes.
    pub fn pause(&self, now: Timestamp, seconds: u32) {
        lock(&self.state).paused_until = until(now, TimeDelta::seconds(i64::from(seconds)));
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        lock(&self.state).paused_until.is_some()
    }

    /// Set sensor input 1 or 2; other inputs are ignored.
    pub fn set_sensor(&self, input: u8, active: bool) {
        let mut state = lock(&self.state);
        match input {
            1 => state.sensor_1 = active,
            2 => state.sensor_2 = active,
            _ => tracing::debug!(input, "controller has no such sensor input"),
        }
    }

    pub fn set_current_draw(&self, milliamps: i64) {
        lock(&self.state).current_draw_ma = milliamps;
    }

    /// Expire a pause or rain delay whose end has passed.
    pub fn settle(&self, now: Timestamp) {
        let mut state = lock(&self.state);
        if state.paused_until.is_some_and(|end| end <= now) {
            state.paused_until = None;
        }
        if state.rain_delay_until.is_some_and(|end| end <= now) {
            state.rain_delay_until = None;
        }
    }

    /// Controller switch plus the system sensors.
    ///
    /// # Errors
    ///
    /// Returns a validation error if an entity builder fails.
    pub fn entities(&self) -> Result<Vec<Entity>, OspiError> {
        let state = lock(&self.state);

        let controller = Entity::builder()
            .entity_id("switch.opensprinkler_controller_enabled")
            .state(on_off(true))
            .role_tag(tag::CONTROLLER)
            .friendly_name("OpenSprinkler Controller Enabled")
            .build()?;

        Ok(vec![
            controller,
            sensor(
                "binary_sensor.opensprinkler_sensor_1_active",
                "Sensor 1 Active",
                on_off(state.sensor_1),
                None,
            )?,
            sensor(
                "binary_sensor.opensprinkler_sensor_2_active",
                "Sensor 2 Active",
                on_off(state.sensor_2),
                None,
            )?,
            sensor(
                "sensor.opensprinkler_current_draw",
                "Current Draw",
                state.current_draw_ma.to_string(),
                Some("mA"),
            )?,
            sensor(
                "sensor.opensprinkler_water_level",
                "Water Level",
                state.water_level_percent.to_string(),
                Some("%"),
            )?,
            sensor(
                "binary_sensor.opensprinkler_paused",
                "Paused",
                on_off(state.paused_until.is_some()),
                None,
            )?,
            sensor(
                "sensor.opensprinkler_pause_end_time",
                "Pause End Time",
                timestamp_state(state.paused_until),
                None,
            )?,
            sensor(
                "binary_sensor.opensprinkler_rain_delay_active",
                "Rain Delay Active",
                on_off(state.rain_delay_until.is_some()),
                None,
            )?,
            sensor(
                "sensor.opensprinkler_rain_delay_stop_time",
                "Rain Delay Stop Time",
                timestamp_state(state.rain_delay_until),
                None,
            )?,
        ])
    }
}

fn timestamp_state(ts: Option<Timestamp>) -> String {
    ts.map_or_else(|| UNKNOWN.to_string(), |ts| ts.to_rfc3339())
}

fn sensor(
    entity_id: &str,
    name: &str,
    state: impl Into<EntityState>,
    unit: Option<&str>,
) -> Result<Entity, OspiError> {
    let mut builder = Entity::builder()
        .entity_id(entity_id)
        .state(state)
        .friendly_name(format!("OpenSprinkler {name}"));
    if let Some(unit) = unit {
        builder = builder.attribute(attr::UNIT_OF_MEASUREMENT, unit);
    }
    builder.build()
}
