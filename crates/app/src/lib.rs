//! # ospi-app
//!
//! Application layer: card controllers and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** the host (or a simulation of it) implements:
//!   - `ServiceCaller`: dispatch `opensprinkler.*` service calls
//!   - `HistoryApi`: fetch the state history of one entity
//!   - `SnapshotPublisher`: push a new snapshot of the host's state
//! - Provide **in-process infrastructure** (snapshot bus, watch gate) that
//!   doesn't need IO
//! - Drive the **station card** and **system card**: accept configuration,
//!   re-derive views when watched entities change, validate dialog input and
//!   turn user actions into service calls
//!
//! ## Dependency rule
//! Depends on `ospi-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
pub mod watch;
