//! Snapshot publisher port: pushes of the host's entity state.

use std::future::Future;
use std::sync::Arc;

use ospi_domain::error::OspiError;
use ospi_domain::snapshot::Snapshot;

/// Publishes snapshots to interested cards.
pub trait SnapshotPublisher {
    /// Publish a snapshot to all current subscribers.
    fn publish(&self, snapshot: Arc<Snapshot>)
    -> impl Future<Output = Result<(), OspiError>> + Send;
}

impl<T: SnapshotPublisher + Send + Sync> SnapshotPublisher for Arc<T> {
    fn publish(
        &self,
        snapshot: Arc<Snapshot>,
    ) -> impl Future<Output = Result<(), OspiError>> + Send {
        (**self).publish(snapshot)
    }
}
