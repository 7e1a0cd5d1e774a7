//! Entity: one host-tracked unit of state (a sensor, a switch, a flag).
//!
//! Entity ids follow the host's `<category>.<slug>` convention and the
//! category prefix is load-bearing: classification matches on it together
//! with the `opensprinkler_type` attribute.

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{OspiError, ValidationError};
use crate::time::{Timestamp, parse_timestamp};

/// Attribute keys the OpenSprinkler integration publishes.
pub mod attr {
    /// Role tag: `station`, `program`, `controller`.
    pub const ROLE_TAG: &str = "opensprinkler_type";
    /// Peer index linking a station/program to its enable switch.
    pub const INDEX: &str = "index";
    pub const RUNNING_PROGRAM_ID: &str = "running_program_id";
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const NAME: &str = "name";
    pub const FRIENDLY_NAME: &str = "friendly_name";
    pub const UNIT_OF_MEASUREMENT: &str = "unit_of_measurement";
}

/// Identifier of the synthetic "run once" entity. It never exists on the host.
pub const RUN_ONCE_ENTITY_ID: &str = "run_once";

/// A host state record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    #[serde(default)]
    pub state: EntityState,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<Timestamp>,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// The synthetic "run once" pseudo-entity.
    #[must_use]
    pub fn run_once() -> Self {
        Self {
            entity_id: RUN_ONCE_ENTITY_ID.to_string(),
            state: EntityState::Off,
            attributes: HashMap::new(),
            last_changed: None,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OspiError::Validation`] when `entity_id` is empty.
    pub fn validate(&self) -> Result<(), OspiError> {
        if self.entity_id.is_empty() {
            return Err(ValidationError::EmptyEntityId.into());
        }
        Ok(())
    }

    /// The `<category>` part of the id, if the id has one.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.entity_id.split_once('.').map(|(category, _)| category)
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    fn attribute_str(&self, key: &str) -> Option<&str> {
        self.get_attribute(key).and_then(AttributeValue::as_str)
    }

    /// Raw role tag value, including non-string values.
    #[must_use]
    pub fn role_tag_value(&self) -> Option<&AttributeValue> {
        self.get_attribute(attr::ROLE_TAG)
    }

    /// Role tag as a string (`station`, `program`, `controller`).
    #[must_use]
    pub fn role_tag(&self) -> Option<&str> {
        self.attribute_str(attr::ROLE_TAG)
    }

    #[must_use]
    pub fn peer_index(&self) -> Option<&AttributeValue> {
        self.get_attribute(attr::INDEX)
    }

    #[must_use]
    pub fn running_program_id(&self) -> Option<i64> {
        self.get_attribute(attr::RUNNING_PROGRAM_ID)
            .and_then(AttributeValue::as_i64)
    }

    #[must_use]
    pub fn start_time(&self) -> Option<Timestamp> {
        self.attribute_str(attr::START_TIME).and_then(parse_timestamp)
    }

    #[must_use]
    pub fn end_time(&self) -> Option<Timestamp> {
        self.attribute_str(attr::END_TIME).and_then(parse_timestamp)
    }

    /// Explicit name attribute (empty names count as absent).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attribute_str(attr::NAME).filter(|name| !name.is_empty())
    }

    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute_str(attr::FRIENDLY_NAME)
    }

    #[must_use]
    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.attribute_str(attr::UNIT_OF_MEASUREMENT)
    }

    /// Interpret the state value itself as a timestamp (`*_stop_time`, `*_end_time` sensors).
    #[must_use]
    pub fn state_timestamp(&self) -> Option<Timestamp> {
        parse_timestamp(self.state.as_str())
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    entity_id: Option<String>,
    state: Option<EntityState>,
    attributes: HashMap<String, AttributeValue>,
    last_changed: Option<Timestamp>,
}

impl EntityBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: impl Into<EntityState>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn role_tag(self, tag: &str) -> Self {
        self.attribute(attr::ROLE_TAG, tag)
    }

    #[must_use]
    pub fn peer_index(self, index: i64) -> Self {
        self.attribute(attr::INDEX, index)
    }

    #[must_use]
    pub fn friendly_name(self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.attribute(attr::FRIENDLY_NAME, name)
    }

    #[must_use]
    pub fn last_changed(mut self, ts: Timestamp) -> Self {
        self.last_changed = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// # Errors
    ///
    /// Returns [`OspiError::Validation`] if `entity_id` is missing or empty.
    pub fn build(self) -> Result<Entity, OspiError> {
        let entity = Entity {
            entity_id: self.entity_id.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            attributes: self.attributes,
            last_changed: self.last_changed,
        };
        entity.validate()?;
        Ok(entity)
    }
}
