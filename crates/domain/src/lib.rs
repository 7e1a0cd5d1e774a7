//! # ospi-domain
//!
//! Pure domain model for the OpenSprinkler dashboard cards.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Model the host's **entities** and **snapshots** (registry + states)
//! - **Classify** entities into roles (station, program, controller, …) and
//!   lifecycle categories (waiting, active, idle)
//! - **Aggregate** device-group status: enabled flags, run-once/manual
//!   detection, system sensors, "ends in" and "last run" text
//! - Define the **service calls** the cards issue and validate the numeric
//!   inputs that feed them
//! - Derive the station and system **card views** from a snapshot
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod card;
pub mod classify;
pub mod entity;
pub mod history;
pub mod humanize;
pub mod input;
pub mod lifecycle;
pub mod naming;
pub mod service;
pub mod snapshot;
pub mod status;
