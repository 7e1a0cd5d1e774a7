//! Snapshot: the host's entity registry and state table at one instant.
//!
//! A snapshot is immutable for the duration of a derivation pass. Cards
//! never cache anything derived from it beyond one render.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// One row of the host's entity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub entity_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Registry entries (in host order) plus the parallel state table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub entities: Vec<RegistryEntry>,
    #[serde(default)]
    pub states: HashMap<String, Entity>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entity` under `device_id` and record its state.
    ///
    /// Re-inserting an existing id replaces its state and keeps its
    /// registry position.
    pub fn insert(&mut self, device_id: Option<&str>, entity: Entity) {
        match self
            .entities
            .iter_mut()
            .find(|entry| entry.entity_id == entity.entity_id)
        {
            Some(entry) => entry.device_id = device_id.map(str::to_string),
            None => self.entities.push(RegistryEntry {
                entity_id: entity.entity_id.clone(),
                device_id: device_id.map(str::to_string),
                name: None,
            }),
        }
        self.states.insert(entity.entity_id.clone(), entity);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_entity(mut self, device_id: &str, entity: Entity) -> Self {
        self.insert(Some(device_id), entity);
        self
    }

    /// Current state record of `entity_id`, if the host has one.
    #[must_use]
    pub fn state(&self, entity_id: &str) -> Option<&Entity> {
        self.states.get(entity_id)
    }

    #[must_use]
    pub fn registry_entry(&self, entity_id: &str) -> Option<&RegistryEntry> {
        self.entities
            .iter()
            .find(|entry| entry.entity_id == entity_id)
    }

    /// Registry entries and their states, optionally restricted to one
    /// device and filtered by `matcher`. Entries without a state are skipped.
    pub fn entities<'a, F>(
        &'a self,
        device: Option<&'a str>,
        mut matcher: F,
    ) -> impl Iterator<Item = (&'a RegistryEntry, &'a Entity)> + 'a
    where
        F: FnMut(&RegistryEntry, &Entity) -> bool + 'a,
    {
        self.entities
            .iter()
            .filter(move |entry| device.is_none_or(|d| entry.device_id.as_deref() == Some(d)))
            .filter_map(|entry| self.states.get(&entry.entity_id).map(|state| (entry, state)))
            .filter(move |&(entry, state)| matcher(entry, state))
    }

    /// The entities of one physical controller.
    #[must_use]
    pub fn device_group<'a>(&'a self, device: &'a str) -> DeviceGroup<'a> {
        self.group(Some(device))
    }

    /// Entities of `device`, or every registered entity when `None`.
    #[must_use]
    pub fn group<'a>(&'a self, device: Option<&'a str>) -> DeviceGroup<'a> {
        DeviceGroup {
            entities: self
                .entities(device, |_, _| true)
                .map(|(_, state)| state)
                .collect(),
        }
    }
}

/// Entities sharing one device reference, in registry order.
#[derive(Debug, Clone, Default)]
pub struct DeviceGroup<'a> {
    entities: Vec<&'a Entity>,
}

impl<'a> DeviceGroup<'a> {
    /// Build a group directly from entities (no registry involved).
    pub fn from_entities(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        Self {
            entities: entities.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Entity> + '_ {
        self.entities.iter().copied()
    }

    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<&'a Entity> {
        self.iter().find(|entity| entity.entity_id == entity_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str) -> Entity {
        Entity::builder().entity_id(id).state("off").build().unwrap()
    }

    #[test]
    fn should_group_entities_by_device_in_registry_order() {
        let snapshot = Snapshot::new()
            .with_entity("os", entity("sensor.b"))
            .with_entity("other", entity("sensor.x"))
            .with_entity("os", entity("sensor.a"));

        let group = snapshot.device_group("os");
        let ids: Vec<&str> = group.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["sensor.b", "sensor.a"]);
    }

    #[test]
    fn should_skip_registry_entries_without_state() {
        let mut snapshot = Snapshot::new().with_entity("os", entity("sensor.a"));
        snapshot.entities.push(RegistryEntry {
            entity_id: "sensor.ghost".to_string(),
            device_id: Some("os".to_string()),
            name: None,
        });

        assert_eq!(snapshot.device_group("os").len(), 1);
    }

    #[test]
    fn should_replace_state_when_reinserted() {
        let mut snapshot = Snapshot::new().with_entity("os", entity("switch.a"));
        let on = Entity::builder().entity_id("switch.a").state("on").build().unwrap();
        snapshot.insert(Some("os"), on);

        assert_eq!(snapshot.entities.len(), 1);
        assert!(snapshot.state("switch.a").unwrap().state.is_on());
    }

    #[test]
    fn should_filter_with_matcher_across_all_devices() {
        let snapshot = Snapshot::new()
            .with_entity("os", entity("sensor.a"))
            .with_entity("other", entity("switch.b"));

        let switches: Vec<_> = snapshot
            .entities(None, |entry, _| entry.entity_id.starts_with("switch."))
            .collect();
        assert_eq!(switches.len(), 1);
    }

    #[test]
    fn should_return_empty_group_for_unknown_device() {
        let snapshot = Snapshot::new().with_entity("os", entity("sensor.a"));
        assert!(snapshot.device_group("nope").is_empty());
    }

    #[test]
    fn should_group_every_device_when_none_given() {
        let snapshot = Snapshot::new()
            .with_entity("os", entity("sensor.a"))
            .with_entity("other", entity("switch.b"));
        assert_eq!(snapshot.group(None).len(), 2);
        assert_eq!(snapshot.group(Some("os")).len(), 1);
    }
}
