//! # ospi-cards: OpenSprinkler cards demo
//!
//! Composition root that wires the virtual controller to both cards and
//! plays a short watering session, printing each rendered card.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the `tracing` subscriber
//! - Construct the virtual controller (host ports) and the snapshot bus
//! - Construct the card controllers, injecting the ports
//! - Drive the session: push snapshots, trigger card actions, print views
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use chrono::TimeDelta;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use ospi_adapter_virtual::VirtualController;
use ospi_app::event_bus::InProcessSnapshotBus;
use ospi_app::ports::SnapshotPublisher;
use ospi_app::services::station_card::StationCard;
use ospi_app::services::system_card::SystemCard;
use ospi_domain::card::{CARD_VERSION, CardKind, StationCardConfig, SystemCardConfig};
use ospi_domain::input::DelayKind;
use ospi_domain::snapshot::Snapshot;
use ospi_domain::time::{Timestamp, now};

use config::Config;

type Station = StationCard<Arc<VirtualController>, Arc<VirtualController>>;
type System = SystemCard<Arc<VirtualController>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading ospi.toml")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    for kind in CardKind::ALL {
        tracing::debug!(
            card_type = kind.type_name(),
            name = kind.name(),
            description = kind.description(),
            version = CARD_VERSION,
            "card registered"
        );
    }

    let start = now();
    let controller = Arc::new(VirtualController::new(
        &config.controller.device,
        config.controller.stations.iter().map(String::as_str),
        start,
    ));
    tracing::info!(
        device = controller.device(),
        stations = controller.stations().len(),
        "virtual controller ready"
    );

    let bus = InProcessSnapshotBus::new(16);
    let mut snapshots = bus.subscribe();

    let mut station_card = StationCard::new(
        Arc::clone(&controller),
        Arc::clone(&controller),
        config.display.offset()?,
    );
    station_card.set_config(Some(station_card_config(&config, &controller)))?;
    let mut system_card = SystemCard::new(Arc::clone(&controller));
    system_card.set_config(Some(system_card_config(&config)))?;

    // idle controller
    let snapshot = push(&controller, &bus, &mut snapshots, start).await?;
    render(&mut station_card, &mut system_card, &snapshot, start).await;

    // a runtime outside the allowed range is refused before any call
    if let Err(err) = station_card.run("45").await {
        tracing::warn!(error = %err, "runtime rejected");
    }
    station_card.run("5").await?;
    let t = start + TimeDelta::minutes(1);
    let snapshot = push(&controller, &bus, &mut snapshots, t).await?;
    render(&mut station_card, &mut system_card, &snapshot, t).await;

    system_card.submit_delay(DelayKind::Rain, "24").await?;
    let t = start + TimeDelta::minutes(2);
    let snapshot = push(&controller, &bus, &mut snapshots, t).await?;
    render(&mut station_card, &mut system_card, &snapshot, t).await;

    // the run ends, then the history lookup is re-armed
    for t in [
        start + TimeDelta::minutes(7),
        start + TimeDelta::minutes(7) + TimeDelta::seconds(3),
    ] {
        let snapshot = push(&controller, &bus, &mut snapshots, t).await?;
        render(&mut station_card, &mut system_card, &snapshot, t).await;
    }

    Ok(())
}

async fn render(station: &mut Station, system: &mut System, snapshot: &Snapshot, at: Timestamp) {
    if station.update(snapshot, at).await {
        print_station(station);
    }
    if system.update(snapshot, at) {
        print_system(system);
    }
}

/// Publish the controller's state at `at` and receive it back from the bus.
async fn push(
    controller: &VirtualController,
    bus: &InProcessSnapshotBus,
    snapshots: &mut broadcast::Receiver<Arc<Snapshot>>,
    at: Timestamp,
) -> anyhow::Result<Arc<Snapshot>> {
    bus.publish(Arc::new(controller.snapshot(at)?)).await?;
    Ok(snapshots.recv().await?)
}

fn station_card_config(config: &Config, controller: &VirtualController) -> StationCardConfig {
    let first = controller.stations().first();
    let mut card = config.station_card.clone().unwrap_or_else(|| StationCardConfig {
        name: first.map(|s| s.name().to_string()).unwrap_or_default(),
        show_name: true,
        ..StationCardConfig::default()
    });
    if card.station.is_none() {
        card.station = first.map(ospi_adapter_virtual::VirtualStation::status_entity_id);
    }
    if card.device.is_none() {
        card.device = Some(controller.device().to_string());
    }
    card
}

fn system_card_config(config: &Config) -> SystemCardConfig {
    let mut card = config.system_card.clone().unwrap_or_else(|| SystemCardConfig {
        name: "OpenSprinkler".to_string(),
        show_name: true,
        show_sensor1: true,
        ..SystemCardConfig::default()
    });
    if card.device.is_none() {
        card.device = Some(config.controller.device.clone());
    }
    card
}

fn print_station(card: &Station) {
    let Some(view) = card.view() else {
        println!("[station] not available");
        return;
    };
    if let Some(title) = &view.title {
        println!("== {title} ==");
    }
    let action = view
        .action
        .map_or(String::new(), |action| format!(" [{action:?}]"));
    println!("{} {}: {}{action}", view.icon, view.station_name, view.status);
    if let Some(remaining) = view.remaining {
        println!("  {}s remaining", remaining.num_seconds());
    }
    if !view.last_run.is_empty() {
        println!("  {}", view.last_run);
    }
}

fn print_system(card: &System) {
    let Some(view) = card.view() else {
        return;
    };
    if let Some(title) = &view.title {
        println!("== {title} ==");
    }
    if view.rain_delay_active {
        println!("  (rain delay active)");
    }
    for item in &view.items {
        println!("  {}: {}", item.name, item.value);
    }
}
