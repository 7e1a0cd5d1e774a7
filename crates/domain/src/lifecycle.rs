//! Lifecycle categories of stations and programs, derived from the raw state.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Queued behind another station.
pub const WAITING_STATES: &[&str] = &["waiting"];
/// Watering right now, whatever started it.
pub const ACTIVE_STATES: &[&str] = &["program", "once_program", "manual", "on"];

#[must_use]
pub fn state_waiting(entity: &Entity) -> bool {
    WAITING_STATES.contains(&entity.state.as_str())
}

#[must_use]
pub fn state_activated(entity: &Entity) -> bool {
    ACTIVE_STATES.contains(&entity.state.as_str())
}

/// Active or waiting: a stop command makes sense.
#[must_use]
pub fn state_stoppable(entity: &Entity) -> bool {
    state_activated(entity) || state_waiting(entity)
}

/// Lifecycle category of a single state value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Waiting,
    Active,
    Idle,
}

impl Lifecycle {
    #[must_use]
    pub fn of(entity: &Entity) -> Self {
        if state_activated(entity) {
            Self::Active
        } else if state_waiting(entity) {
            Self::Waiting
        } else {
            Self::Idle
        }
    }

    #[must_use]
    pub fn is_stoppable(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVED: &[&str] = &[
        "program",
        "once_program",
        "manual",
        "on",
        "off",
        "waiting",
        "idle",
        "unknown",
        "unavailable",
        "",
        "Program",
    ];

    fn with_state(state: &str) -> Entity {
        Entity::builder()
            .entity_id("sensor.front_lawn_station_status")
            .state(state)
            .build()
            .unwrap()
    }

    #[test]
    fn should_define_stoppable_as_union_of_active_and_waiting() {
        for state in OBSERVED {
            let entity = with_state(state);
            assert_eq!(
                state_stoppable(&entity),
                state_activated(&entity) || state_waiting(&entity),
                "{state}"
            );
        }
    }

    #[test]
    fn should_match_state_strings_exactly() {
        assert!(state_activated(&with_state("manual")));
        assert!(!state_activated(&with_state("Manual")));
        assert!(!state_activated(&with_state("waiting")));
        assert!(state_waiting(&with_state("waiting")));
    }

    #[test]
    fn should_categorise_states() {
        assert_eq!(Lifecycle::of(&with_state("once_program")), Lifecycle::Active);
        assert_eq!(Lifecycle::of(&with_state("waiting")), Lifecycle::Waiting);
        assert_eq!(Lifecycle::of(&with_state("off")), Lifecycle::Idle);
    }

    #[test]
    fn should_agree_with_stoppable_predicate() {
        for state in OBSERVED {
            let entity = with_state(state);
            assert_eq!(
                Lifecycle::of(&entity).is_stoppable(),
                state_stoppable(&entity),
                "{state}"
            );
        }
    }
}
