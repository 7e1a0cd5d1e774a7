//! Status aggregation over a device group.
//!
//! Everything here is a pure function of one [`DeviceGroup`] (and, for the
//! time-based text, the current instant). Absent data resolves to a safe
//! default (`false`, `None`, `"off"`) and never to an error.

use std::collections::BTreeMap;

use chrono::TimeDelta;

use crate::classify::{
    Role, is_pause_end_time, is_paused_sensor, is_rain_delay_active_sensor,
    is_rain_delay_stop_time, is_station_prog_enable,
};
use crate::entity::{AttributeValue, Entity};
use crate::humanize::humanize_relative;
use crate::snapshot::DeviceGroup;
use crate::time::Timestamp;

/// `running_program_id` of a station started by hand.
pub const MANUAL_PROGRAM_ID: i64 = 99;
/// `running_program_id` of a station started by "run once".
pub const RUN_ONCE_PROGRAM_ID: i64 = 254;

/// Fallback text of an "ends in" status without a usable end time.
pub const OFF_TEXT: &str = "off";

/// Whether `entity` is enabled on the controller.
///
/// Run-once is always enabled. Anything else is enabled iff the group holds
/// a `switch.` sibling with the same peer index and role tag whose state is
/// `on`. An absent index or tag only matches another absent one.
#[must_use]
pub fn is_enabled(group: &DeviceGroup<'_>, entity: &Entity) -> bool {
    if Role::of(entity) == Role::RunOnce {
        return true;
    }
    let key = enable_key(entity);
    group.iter().any(|candidate| {
        is_station_prog_enable(candidate)
            && enable_key(candidate) == key
            && candidate.state.is_on()
    })
}

type EnableKey = (Option<String>, Option<String>);

fn attribute_key(value: &AttributeValue) -> String {
    match value.as_i64() {
        Some(n) => n.to_string(),
        None => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Peer index in a comparable form: `0` and `0.0` are the same station.
pub(crate) fn peer_key(entity: &Entity) -> Option<String> {
    entity.peer_index().map(attribute_key)
}

fn enable_key(entity: &Entity) -> EnableKey {
    (peer_key(entity), entity.role_tag_value().map(attribute_key))
}

/// Enable switches of a device group indexed by `(peer index, role tag)`.
///
/// Answers [`is_enabled`] queries without rescanning the group. Several
/// switches sharing one key is not expected from the host; they are kept in
/// group order and reported by [`conflicts`](Self::conflicts).
#[derive(Debug, Default)]
pub struct EnableIndex<'a> {
    switches: BTreeMap<EnableKey, Vec<&'a Entity>>,
}

impl<'a> EnableIndex<'a> {
    #[must_use]
    pub fn build(group: &DeviceGroup<'a>) -> Self {
        let mut switches: BTreeMap<EnableKey, Vec<&'a Entity>> = BTreeMap::new();
        for entity in group.iter().filter(|e| is_station_prog_enable(e)) {
            switches.entry(enable_key(entity)).or_default().push(entity);
        }
        Self { switches }
    }

    /// Same answer as [`is_enabled`] for the group this index was built from.
    #[must_use]
    pub fn is_enabled(&self, entity: &Entity) -> bool {
        if Role::of(entity) == Role::RunOnce {
            return true;
        }
        self.switches
            .get(&enable_key(entity))
            .is_some_and(|switches| switches.iter().any(|s| s.state.is_on()))
    }

    /// Entity ids of switches that share a `(peer index, role tag)` key.
    #[must_use]
    pub fn conflicts(&self) -> Vec<Vec<&'a str>> {
        self.switches
            .values()
            .filter(|switches| switches.len() > 1)
            .map(|switches| switches.iter().map(|s| s.entity_id.as_str()).collect())
            .collect()
    }
}

fn any_station_running(group: &DeviceGroup<'_>, program_id: i64) -> bool {
    group
        .iter()
        .filter(|e| Role::of(e) == Role::Station)
        .any(|e| e.running_program_id() == Some(program_id))
}

/// A station is being driven by a "run once" program.
#[must_use]
pub fn has_run_once(group: &DeviceGroup<'_>) -> bool {
    any_station_running(group, RUN_ONCE_PROGRAM_ID)
}

/// A station is being driven by a manual run.
#[must_use]
pub fn has_manual(group: &DeviceGroup<'_>) -> bool {
    any_station_running(group, MANUAL_PROGRAM_ID)
}

#[must_use]
pub fn has_rain_delay_active(group: &DeviceGroup<'_>) -> bool {
    group
        .iter()
        .filter(|e| is_rain_delay_active_sensor(e))
        .any(|e| e.state.is_on())
}

/// Controller-wide sensors of the group, keyed by entity id.
#[must_use]
pub fn system_status_entities<'a>(group: &DeviceGroup<'a>) -> BTreeMap<&'a str, &'a Entity> {
    group
        .iter()
        .filter(|e| Role::of(e) == Role::SystemSensor)
        .map(|e| (e.entity_id.as_str(), e))
        .collect()
}

/// Time left until the entity's `end_time` attribute, clamped at zero.
#[must_use]
pub fn remaining(entity: &Entity, now: Timestamp) -> Option<TimeDelta> {
    entity
        .end_time()
        .map(|end| (end - now).max(TimeDelta::zero()))
}

/// Status text of an "active until" flag such as rain delay or pause.
///
/// While `active` is not `on` its own state is shown. While it is `on`,
/// the target time comes from the state of `end_time`; an absent, unknown
/// or unparseable target yields `"off"`.
#[must_use]
pub fn ends_in_status(active: &Entity, end_time: Option<&Entity>, now: Timestamp) -> String {
    if !active.state.is_on() {
        return active.state.as_str().to_string();
    }
    match end_time.and_then(Entity::state_timestamp) {
        Some(target) => format!("Ends {}", humanize_relative(target - now)),
        None => OFF_TEXT.to_string(),
    }
}

/// Rain-delay status text, `None` when the group has no rain-delay sensor.
#[must_use]
pub fn rain_delay_status(group: &DeviceGroup<'_>, now: Timestamp) -> Option<String> {
    let active = group.iter().find(|e| is_rain_delay_active_sensor(e))?;
    let stop = group.iter().find(|e| is_rain_delay_stop_time(e));
    Some(ends_in_status(active, stop, now))
}

/// Pause status text, `None` when the group has no paused sensor.
#[must_use]
pub fn pause_status(group: &DeviceGroup<'_>, now: Timestamp) -> Option<String> {
    let active = group.iter().find(|e| is_paused_sensor(e))?;
    let end = group.iter().find(|e| is_pause_end_time(e));
    Some(ends_in_status(active, end, now))
}
