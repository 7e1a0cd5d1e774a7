//! Entity classification: which part of the irrigation controller an
//! entity represents.
//!
//! The individual predicates mirror the host integration's naming rules and
//! are total: an entity with missing attributes simply matches nothing.
//! [`Role::of`] folds them into one total function with a fixed precedence.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, RUN_ONCE_ENTITY_ID};

/// Role tag values published by the integration.
pub mod tag {
    pub const STATION: &str = "station";
    pub const PROGRAM: &str = "program";
    pub const CONTROLLER: &str = "controller";
}

const SENSOR: &str = "sensor.";
const BINARY_SENSOR: &str = "binary_sensor.";
const SWITCH: &str = "switch.";

fn tagged(entity: &Entity, prefix: &str, role: &str) -> bool {
    entity.entity_id.starts_with(prefix) && entity.role_tag() == Some(role)
}

#[must_use]
pub fn is_station(entity: &Entity) -> bool {
    tagged(entity, SENSOR, tag::STATION)
}

#[must_use]
pub fn is_program(entity: &Entity) -> bool {
    tagged(entity, BINARY_SENSOR, tag::PROGRAM)
}

#[must_use]
pub fn is_controller(entity: &Entity) -> bool {
    tagged(entity, SWITCH, tag::CONTROLLER)
}

/// No role tag at all: a controller-wide sensor (flow rate, rain delay, …).
#[must_use]
pub fn is_system(entity: &Entity) -> bool {
    entity.role_tag_value().is_none()
}

#[must_use]
pub fn is_run_once(entity: &Entity) -> bool {
    entity.entity_id == RUN_ONCE_ENTITY_ID
}

/// Role tag absent or falsy. Overlaps with [`is_system`].
#[must_use]
pub fn is_state(entity: &Entity) -> bool {
    !entity.role_tag_value().is_some_and(|tag| tag.is_truthy())
}

/// The enable/disable toggle of a station or program.
#[must_use]
pub fn is_station_prog_enable(entity: &Entity) -> bool {
    entity.entity_id.starts_with(SWITCH)
}

#[must_use]
pub fn is_play_pausable(entity: &Entity) -> bool {
    is_station(entity) || is_program(entity) || is_run_once(entity)
}

#[must_use]
pub fn is_rain_delay_active_sensor(entity: &Entity) -> bool {
    entity.entity_id.starts_with(BINARY_SENSOR) && entity.entity_id.ends_with("rain_delay_active")
}

#[must_use]
pub fn is_rain_delay_stop_time(entity: &Entity) -> bool {
    entity.entity_id.starts_with(SENSOR) && entity.entity_id.ends_with("rain_delay_stop_time")
}

#[must_use]
pub fn is_paused_sensor(entity: &Entity) -> bool {
    entity.entity_id.starts_with(BINARY_SENSOR) && entity.entity_id.ends_with("paused")
}

#[must_use]
pub fn is_pause_end_time(entity: &Entity) -> bool {
    entity.entity_id.starts_with(SENSOR) && entity.entity_id.ends_with("pause_end_time")
}

/// Domain role of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Station,
    Program,
    Controller,
    SystemSensor,
    RunOnce,
    /// Tagged but none of the above; in practice the `switch.` enable
    /// toggles of stations and programs.
    PlainSwitch,
}

impl Role {
    /// Classify `entity`. First match wins, in this order:
    /// run-once, station, program, controller, system sensor, plain switch.
    #[must_use]
    pub fn of(entity: &Entity) -> Self {
        if is_run_once(entity) {
            Self::RunOnce
        } else if is_station(entity) {
            Self::Station
        } else if is_program(entity) {
            Self::Program
        } else if is_controller(entity) {
            Self::Controller
        } else if is_system(entity) {
            Self::SystemSensor
        } else {
            Self::PlainSwitch
        }
    }

    #[must_use]
    pub fn is_play_pausable(self) -> bool {
        matches!(self, Self::Station | Self::Program | Self::RunOnce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AttributeValue;

    fn tagged_entity(id: &str, role: &str) -> Entity {
        Entity::builder().entity_id(id).role_tag(role).build().unwrap()
    }

    fn plain(id: &str) -> Entity {
        Entity::builder().entity_id(id).build().unwrap()
    }

    fn fixtures() -> Vec<Entity> {
        vec![
            tagged_entity("sensor.front_lawn_station_status", "station"),
            tagged_entity("binary_sensor.front_lawn_station_running", "station"),
            tagged_entity("switch.front_lawn_station_enabled", "station"),
            tagged_entity("binary_sensor.morning_program_running", "program"),
            tagged_entity("switch.morning_program_enabled", "program"),
            tagged_entity("switch.opensprinkler_enabled", "controller"),
            plain("sensor.opensprinkler_flow_rate"),
            plain("binary_sensor.opensprinkler_rain_delay_active"),
            Entity::run_once(),
            serde_json::from_str(r#"{"entity_id": "sensor.malformed"}"#).unwrap(),
            serde_json::from_str(r#"{"entity_id": ""}"#).unwrap(),
        ]
    }

    #[test]
    fn should_never_classify_entity_as_both_station_and_program() {
        for entity in fixtures() {
            assert!(
                !(is_station(&entity) && is_program(&entity)),
                "{}",
                entity.entity_id
            );
        }
    }

    #[test]
    fn should_require_both_prefix_and_tag() {
        assert!(is_station(&tagged_entity("sensor.a", "station")));
        assert!(!is_station(&tagged_entity("binary_sensor.a", "station")));
        assert!(!is_station(&tagged_entity("sensor.a", "program")));
        assert!(is_program(&tagged_entity("binary_sensor.p", "program")));
        assert!(is_controller(&tagged_entity("switch.c", "controller")));
        assert!(!is_controller(&tagged_entity("sensor.c", "controller")));
    }

    #[test]
    fn should_not_match_any_role_when_attributes_missing() {
        let entity: Entity = serde_json::from_str(r#"{"entity_id": "sensor.x"}"#).unwrap();
        assert!(!is_station(&entity));
        assert!(!is_program(&entity));
        assert!(!is_controller(&entity));
        assert!(is_system(&entity));
        assert!(is_state(&entity));
    }

    #[test]
    fn should_treat_null_tag_as_state_but_not_system() {
        let entity = Entity::builder()
            .entity_id("sensor.x")
            .attribute(
                crate::entity::attr::ROLE_TAG,
                AttributeValue::Json(serde_json::Value::Null),
            )
            .build()
            .unwrap();
        assert!(is_state(&entity));
        assert!(!is_system(&entity));
    }

    #[test]
    fn should_match_rain_delay_and_pause_ids_by_suffix() {
        assert!(is_rain_delay_active_sensor(&plain(
            "binary_sensor.opensprinkler_rain_delay_active"
        )));
        assert!(!is_rain_delay_active_sensor(&plain(
            "sensor.opensprinkler_rain_delay_active"
        )));
        assert!(is_rain_delay_stop_time(&plain(
            "sensor.opensprinkler_rain_delay_stop_time"
        )));
        assert!(is_paused_sensor(&plain("binary_sensor.opensprinkler_paused")));
        assert!(is_pause_end_time(&plain("sensor.opensprinkler_pause_end_time")));
    }

    #[test]
    fn should_assign_exactly_one_role_with_documented_precedence() {
        let roles: Vec<Role> = fixtures().iter().map(Role::of).collect();
        assert_eq!(
            roles,
            vec![
                Role::Station,
                Role::PlainSwitch,
                Role::PlainSwitch,
                Role::Program,
                Role::PlainSwitch,
                Role::Controller,
                Role::SystemSensor,
                Role::SystemSensor,
                Role::RunOnce,
                Role::SystemSensor,
                Role::SystemSensor,
            ]
        );
    }

    #[test]
    fn should_agree_with_play_pausable_predicate() {
        for entity in fixtures() {
            assert_eq!(
                Role::of(&entity).is_play_pausable(),
                is_play_pausable(&entity),
                "{}",
                entity.entity_id
            );
        }
    }

    #[test]
    fn should_flag_switch_prefix_as_enable_toggle() {
        assert!(is_station_prog_enable(&plain("switch.front_lawn_station_enabled")));
        assert!(!is_station_prog_enable(&plain("sensor.front_lawn")));
    }
}
