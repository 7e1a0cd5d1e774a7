//! Card configuration as stored in the dashboard (camelCase keys).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const IMAGE_BASE: &str = "/local/images/ospi-card/";
const DEFAULT_IMAGE_HEIGHT: u32 = 150;

/// Icons of the station badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconConfig {
    pub active: String,
    pub active_disabled: String,
    pub idle: String,
    pub idle_disabled: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            active: "mdi:water".to_string(),
            active_disabled: "mdi:water-off".to_string(),
            idle: "mdi:water-outline".to_string(),
            idle_disabled: "mdi:water-off-outline".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Cover,
    Contain,
}

/// Optional header image shared by both cards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_position: Option<ImagePosition>,
}

impl ImageConfig {
    /// Image location; bare file names live under `/local/images/ospi-card/`.
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        let image = self.image.as_deref().filter(|image| !image.is_empty())?;
        if image.starts_with("http") || image.starts_with('/') {
            Some(image.to_string())
        } else {
            Some(format!("{IMAGE_BASE}{image}"))
        }
    }

    /// Height in pixels; unset or zero means the default.
    #[must_use]
    pub fn image_height(&self) -> u32 {
        self.image_height
            .filter(|height| *height > 0)
            .unwrap_or(DEFAULT_IMAGE_HEIGHT)
    }

    #[must_use]
    pub fn image_position(&self) -> ImagePosition {
        self.image_position.unwrap_or_default()
    }
}

fn require<T>(config: Option<T>) -> Result<T, ValidationError> {
    config.ok_or(ValidationError::MissingConfiguration)
}

/// Configuration of the station card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationCardConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub show_name: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Entity id of the station's status sensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(default)]
    pub icons: IconConfig,
    #[serde(flatten)]
    pub image: ImageConfig,
}

impl StationCardConfig {
    /// Accept a configuration handed over by the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingConfiguration`] when `config` is absent.
    pub fn set(config: Option<Self>) -> Result<Self, ValidationError> {
        require(config)
    }
}

/// Configuration of the system card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCardConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub show_name: bool,
    #[serde(default)]
    pub show_sensor1: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor1_name: Option<String>,
    #[serde(default)]
    pub show_sensor2: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(flatten)]
    pub image: ImageConfig,
}

impl SystemCardConfig {
    /// Accept a configuration handed over by the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingConfiguration`] when `config` is absent.
    pub fn set(config: Option<Self>) -> Result<Self, ValidationError> {
        require(config)
    }
}
