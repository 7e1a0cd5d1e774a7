//! Validation of the numeric dialog inputs that feed service calls.
//!
//! Dialog fields arrive as text. Invalid input is rejected with a
//! [`ValidationError`] whose message is shown inline, and no command is built.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Shortest manual run, in minutes.
pub const MIN_RUNTIME_MINUTES: u32 = 1;
/// Longest manual run, in minutes.
pub const MAX_RUNTIME_MINUTES: u32 = 30;
/// Value the runtime dialog opens with.
pub const DEFAULT_RUNTIME_MINUTES: u32 = 1;

/// A validated manual run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunDuration {
    minutes: u32,
}

impl RunDuration {
    /// # Errors
    ///
    /// Returns [`ValidationError::RuntimeOutOfRange`] outside
    /// [`MIN_RUNTIME_MINUTES`]`..=`[`MAX_RUNTIME_MINUTES`].
    pub fn from_minutes(minutes: u32) -> Result<Self, ValidationError> {
        if (MIN_RUNTIME_MINUTES..=MAX_RUNTIME_MINUTES).contains(&minutes) {
            Ok(Self { minutes })
        } else {
            Err(Self::out_of_range())
        }
    }

    /// Parse the runtime field. Anything that is not a whole number in
    /// range gets the same range message.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RuntimeOutOfRange`].
    pub fn from_minutes_input(raw: &str) -> Result<Self, ValidationError> {
        let minutes = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| Self::out_of_range())?;
        Self::from_minutes(minutes)
    }

    fn out_of_range() -> ValidationError {
        ValidationError::RuntimeOutOfRange {
            min: MIN_RUNTIME_MINUTES,
            max: MAX_RUNTIME_MINUTES,
        }
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.minutes
    }

    #[must_use]
    pub fn as_seconds(self) -> u32 {
        self.minutes * 60
    }
}

impl Default for RunDuration {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_RUNTIME_MINUTES,
        }
    }
}

/// Which delay dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayKind {
    /// Rain delay, entered in hours.
    Rain,
    /// Pause all stations, entered in seconds.
    Pause,
}

impl DelayKind {
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Rain => "hours",
            Self::Pause => "seconds",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Rain => "Rain Delay",
            Self::Pause => "Pause Stations",
        }
    }

    /// Label of the dialog's input field.
    #[must_use]
    pub fn label(self) -> String {
        format!("Enter delay in {}", self.unit())
    }
}

/// A validated delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayInput {
    RainDelayHours(u32),
    PauseSeconds(u32),
}

impl DelayInput {
    /// Parse the delay field for `kind`: a non-negative whole number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDelay`] naming the expected unit.
    pub fn parse(kind: DelayKind, raw: &str) -> Result<Self, ValidationError> {
        let value = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidDelay { unit: kind.unit() })?;
        Ok(match kind {
            DelayKind::Rain => Self::RainDelayHours(value),
            DelayKind::Pause => Self::PauseSeconds(value),
        })
    }

    #[must_use]
    pub fn kind(self) -> DelayKind {
        match self {
            Self::RainDelayHours(_) => DelayKind::Rain,
            Self::PauseSeconds(_) => DelayKind::Pause,
        }
    }
}
