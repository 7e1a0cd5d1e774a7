//! Display names derived from host entity names.

use crate::entity::Entity;

const VENDOR_PREFIX: &str = "OpenSprinkler ";
const STATION_SUFFIX: &str = " Station Status";
const PROGRAM_SUFFIX: &str = " Program Running";
const ACTIVE_SUFFIX: &str = " Active";

/// Short name of a station or program.
///
/// Prefers the explicit `name` attribute; otherwise trims the integration's
/// decorations off the friendly name. Falls back to the entity id.
#[must_use]
pub fn display_name(entity: &Entity) -> String {
    if let Some(name) = entity.name() {
        return name.to_string();
    }
    let Some(friendly) = entity.friendly_name() else {
        return entity.entity_id.clone();
    };

    let trimmed = friendly.strip_suffix(STATION_SUFFIX).unwrap_or(friendly);
    let trimmed = trimmed.strip_suffix(PROGRAM_SUFFIX).unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix(VENDOR_PREFIX).unwrap_or(trimmed);
    trimmed.to_string()
}

/// Label of a controller-wide sensor on the system card.
///
/// Removes the first `"OpenSprinkler "` and the first `" Active"` wherever
/// they occur, so `"OpenSprinkler Rain Delay Active"` becomes `"Rain Delay"`.
#[must_use]
pub fn system_sensor_name(entity: &Entity) -> String {
    let friendly = entity.friendly_name().unwrap_or(&entity.entity_id);
    let name = friendly.replacen(VENDOR_PREFIX, "", 1);
    name.replacen(ACTIVE_SUFFIX, "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::attr;

    fn named(friendly: &str) -> Entity {
        Entity::builder()
            .entity_id("sensor.x")
            .friendly_name(friendly)
            .build()
            .unwrap()
    }

    #[test]
    fn should_strip_vendor_prefix_and_station_suffix() {
        let entity = named("OpenSprinkler Front Lawn Station Status");
        assert_eq!(display_name(&entity), "Front Lawn");
    }

    #[test]
    fn should_strip_program_suffix() {
        let entity = named("OpenSprinkler Morning Program Running");
        assert_eq!(display_name(&entity), "Morning");
    }

    #[test]
    fn should_only_strip_anchored_decorations() {
        let entity = named("Front OpenSprinkler Station Status Lawn");
        assert_eq!(
            display_name(&entity),
            "Front OpenSprinkler Station Status Lawn"
        );
    }

    #[test]
    fn should_prefer_explicit_name_attribute() {
        let entity = Entity::builder()
            .entity_id("sensor.x")
            .friendly_name("OpenSprinkler Front Lawn Station Status")
            .attribute(attr::NAME, "Lawn")
            .build()
            .unwrap();
        assert_eq!(display_name(&entity), "Lawn");
    }

    #[test]
    fn should_fall_back_to_entity_id_without_names() {
        let entity = Entity::builder().entity_id("sensor.x").build().unwrap();
        assert_eq!(display_name(&entity), "sensor.x");
    }

    #[test]
    fn should_strip_first_vendor_and_active_occurrence_for_system_sensor() {
        let entity = named("OpenSprinkler Rain Delay Active");
        assert_eq!(system_sensor_name(&entity), "Rain Delay");

        let entity = named("OpenSprinkler Sensor 1 Active");
        assert_eq!(system_sensor_name(&entity), "Sensor 1");

        let entity = named("OpenSprinkler Flow Rate");
        assert_eq!(system_sensor_name(&entity), "Flow Rate");
    }
}
