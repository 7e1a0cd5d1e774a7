//! Entity state: the raw state value reported by the host.

use serde::{Deserialize, Serialize};

/// State value of an entity.
///
/// The host reports free-form strings; the common ones get named variants,
/// everything else (`program`, `manual`, `waiting`, a sensor reading, a
/// timestamp, …) is kept verbatim in [`Custom`](Self::Custom).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
    Custom(String),
}

impl EntityState {
    /// The state as the host spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
            Self::Unavailable => "unavailable",
            Self::Custom(value) => value,
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Whether the state carries a value worth displaying.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown) && !self.as_str().is_empty()
    }
}

impl From<&str> for EntityState {
    fn from(value: &str) -> Self {
        match value {
            "on" => Self::On,
            "off" => Self::Off,
            "unknown" => Self::Unknown,
            "unavailable" => Self::Unavailable,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for EntityState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "on" | "off" | "unknown" | "unavailable" => Self::from(value.as_str()),
            _ => Self::Custom(value),
        }
    }
}

impl From<EntityState> for String {
    fn from(state: EntityState) -> Self {
        match state {
            EntityState::Custom(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
