//! In-process snapshot bus backed by a tokio broadcast channel.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;

use ospi_domain::error::OspiError;
use ospi_domain::snapshot::Snapshot;

use crate::ports::SnapshotPublisher;

/// In-process snapshot bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the snapshot is simply dropped). A subscriber that lags behind skips
/// straight to newer snapshots; only the latest one matters to a card.
pub struct InProcessSnapshotBus {
    sender: broadcast::Sender<Arc<Snapshot>>,
}

impl InProcessSnapshotBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to snapshots on this bus.
    ///
    /// Returns a receiver that will get all snapshots published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Snapshot>> {
        self.sender.subscribe()
    }
}

impl SnapshotPublisher for InProcessSnapshotBus {
    fn publish(
        &self,
        snapshot: Arc<Snapshot>,
    ) -> impl Future<Output = Result<(), OspiError>> + Send {
        if self.sender.send(snapshot).is_err() {
            tracing::trace!("snapshot published without subscribers");
        }
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ospi_domain::entity::Entity;

    fn snapshot(entity_id: &str) -> Arc<Snapshot> {
        let entity = Entity::builder().entity_id(entity_id).build().unwrap();
        Arc::new(Snapshot::new().with_entity("os-1", entity))
    }

    #[tokio::test]
    async fn should_deliver_snapshot_to_subscriber() {
        let bus = InProcessSnapshotBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(snapshot("sensor.a")).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert!(received.state("sensor.a").is_some());
    }

    #[tokio::test]
    async fn should_deliver_snapshot_to_multiple_subscribers() {
        let bus = InProcessSnapshotBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let published = snapshot("sensor.a");
        bus.publish(Arc::clone(&published)).await.unwrap();

        let r1 = rx1.recv().await.unwrap();
        let r2 = rx2.recv().await.unwrap();
        assert!(Arc::ptr_eq(&r1, &published));
        assert!(Arc::ptr_eq(&r2, &published));
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessSnapshotBus::new(16);
        assert!(bus.publish(snapshot("sensor.a")).await.is_ok());
    }

    #[tokio::test]
    async fn should_not_deliver_snapshots_published_before_subscription() {
        let bus = InProcessSnapshotBus::new(16);
        bus.publish(snapshot("sensor.early")).await.unwrap();

        let mut rx = bus.subscribe();
        bus.publish(snapshot("sensor.late")).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert!(received.state("sensor.late").is_some());
        assert!(received.state("sensor.early").is_none());
    }
}
