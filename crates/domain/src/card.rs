//! Cards: configuration and view derivation for the two dashboard cards.
//!
//! A card view is plain data: what to show and which actions to offer.
//! Turning it into markup is the rendering layer's job.

mod config;
mod station;
mod system;

pub use config::{IconConfig, ImageConfig, ImagePosition, StationCardConfig, SystemCardConfig};
pub use station::{StationAction, StationStatus, StationView, history_source, station_group};
pub use system::{SYSTEM_SENSORS, SystemStatusItem, SystemView, delay_target};

/// Version reported by every card.
pub const CARD_VERSION: &str = "0.3.0";

/// The custom elements registered with the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    StationCard,
    StationCardEditor,
    SystemCard,
    SystemCardEditor,
}

impl CardKind {
    pub const ALL: [Self; 4] = [
        Self::StationCard,
        Self::StationCardEditor,
        Self::SystemCard,
        Self::SystemCardEditor,
    ];

    /// Element type as referenced from dashboard YAML.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::StationCard => "ospi-stationcard",
            Self::StationCardEditor => "ospi-stationcard-editor",
            Self::SystemCard => "ospi-systemcard",
            Self::SystemCardEditor => "ospi-systemcard-editor",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::StationCard => "OSPi StationCard",
            Self::StationCardEditor => "OSPi StationCard Editor",
            Self::SystemCard => "OSPi SystemCard",
            Self::SystemCardEditor => "OSPi SystemCard Editor",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::StationCard => "OpenSprinkler Station Card",
            Self::StationCardEditor => "OpenSprinkler Station Card Configuration Editor",
            Self::SystemCard => "OpenSprinkler System Card",
            Self::SystemCardEditor => "OpenSprinkler System Card Configuration Editor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_unique_type_names() {
        let mut names: Vec<&str> = CardKind::ALL.iter().map(|k| k.type_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn should_name_station_card() {
        assert_eq!(CardKind::StationCard.type_name(), "ospi-stationcard");
        assert_eq!(CardKind::StationCard.name(), "OSPi StationCard");
    }
}
