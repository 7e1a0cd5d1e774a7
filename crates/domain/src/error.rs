//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`OspiError`]
//! via `#[from]`.

/// Top-level error for the OpenSprinkler cards.
#[derive(Debug, thiserror::Error)]
pub enum OspiError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Failure reported by the host platform (service call, history fetch).
    #[error("host error")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Rejected input or configuration.
///
/// The `Display` text of each variant is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid configuration")]
    MissingConfiguration,

    #[error("Runtime must be between {min} and {max} minutes")]
    RuntimeOutOfRange { min: u32, max: u32 },

    #[error("Delay must be a whole number of {unit}")]
    InvalidDelay { unit: &'static str },

    #[error("entity_id must not be empty")]
    EmptyEntityId,
}

/// A referenced entity does not exist in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_runtime_range_message() {
        let err = ValidationError::RuntimeOutOfRange { min: 1, max: 30 };
        assert_eq!(err.to_string(), "Runtime must be between 1 and 30 minutes");
    }

    #[test]
    fn should_display_missing_configuration_message() {
        assert_eq!(
            ValidationError::MissingConfiguration.to_string(),
            "Invalid configuration"
        );
    }

    #[test]
    fn should_convert_validation_error_into_ospi_error() {
        let err: OspiError = ValidationError::EmptyEntityId.into();
        assert!(matches!(
            err,
            OspiError::Validation(ValidationError::EmptyEntityId)
        ));
    }

    #[test]
    fn should_display_not_found_with_id() {
        let err = NotFoundError {
            entity: "Station",
            id: "sensor.front_lawn_station_status".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Station not found: sensor.front_lawn_station_status"
        );
    }
}
