//! Re-render gate: compares the watched entities of consecutive snapshots.

use ospi_domain::entity::Entity;
use ospi_domain::snapshot::Snapshot;

/// Decides whether a card must re-derive its view.
///
/// An update is due when the configuration changed, when no snapshot has
/// been seen yet, or when any watched entity differs from the previous
/// snapshot (including appearing or disappearing).
#[derive(Debug, Default)]
pub struct WatchGate {
    previous: Option<Vec<(String, Option<Entity>)>>,
    config_changed: bool,
}

impl WatchGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next [`should_update`](Self::should_update) to pass.
    pub fn config_changed(&mut self) {
        self.config_changed = true;
    }

    /// Record the watched entities of `snapshot` and report whether any of
    /// them changed since the previous call.
    pub fn should_update<'a>(
        &mut self,
        snapshot: &Snapshot,
        watched: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        let current: Vec<(String, Option<Entity>)> = watched
            .into_iter()
            .map(|entity_id| (entity_id.to_string(), snapshot.state(entity_id).cloned()))
            .collect();

        let changed = std::mem::take(&mut self.config_changed)
            || self
                .previous
                .as_ref()
                .is_none_or(|previous| *previous != current);
        self.previous = Some(current);
        changed
    }
}
