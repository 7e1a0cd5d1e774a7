//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the cards and the host platform.
//! They are defined here (in `app`) so that both the card controllers and
//! the adapter layer can depend on them without creating circular dependencies.

pub mod history;
pub mod service_caller;
pub mod snapshot_publisher;

pub use history::HistoryApi;
pub use service_caller::ServiceCaller;
pub use snapshot_publisher::SnapshotPublisher;
