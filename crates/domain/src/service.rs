//! Service calls: the commands the cards hand to the host.
//!
//! All calls go to the `opensprinkler` integration domain. The cards never
//! wait on a result beyond the host accepting the call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::CallId;
use crate::input::{DelayInput, RunDuration};

/// Integration domain every call is addressed to.
pub const DOMAIN: &str = "opensprinkler";

/// Service names exposed by the integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Run,
    Stop,
    SetRainDelay,
    PauseStations,
}

impl Service {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Stop => "stop",
            Self::SetRainDelay => "set_rain_delay",
            Self::PauseStations => "pause_stations",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-specific payload, flattened next to `entity_id` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServiceData {
    Run { run_seconds: u32 },
    SetRainDelay { rain_delay: u32 },
    PauseStations { pause_duration: u32 },
    Empty {},
}

/// A command for the host's `callService(domain, service, data)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCall {
    #[serde(skip)]
    pub id: CallId,
    pub domain: &'static str,
    pub service: Service,
    /// Entity the call is addressed to.
    pub entity_id: String,
    pub data: ServiceData,
}

impl ServiceCall {
    fn new(service: Service, entity_id: impl Into<String>, data: ServiceData) -> Self {
        Self {
            id: CallId::new(),
            domain: DOMAIN,
            service,
            entity_id: entity_id.into(),
            data,
        }
    }

    /// Stop whatever the station is doing.
    #[must_use]
    pub fn stop(station: impl Into<String>) -> Self {
        Self::new(Service::Stop, station, ServiceData::Empty {})
    }

    /// Run the station for `duration`.
    #[must_use]
    pub fn run(station: impl Into<String>, duration: RunDuration) -> Self {
        Self::new(
            Service::Run,
            station,
            ServiceData::Run {
                run_seconds: duration.as_seconds(),
            },
        )
    }

    /// Delay all watering for `hours` (0 clears the delay).
    #[must_use]
    pub fn set_rain_delay(target: impl Into<String>, hours: u32) -> Self {
        Self::new(
            Service::SetRainDelay,
            target,
            ServiceData::SetRainDelay { rain_delay: hours },
        )
    }

    /// Pause all stations for `seconds`.
    #[must_use]
    pub fn pause_stations(target: impl Into<String>, seconds: u32) -> Self {
        Self::new(
            Service::PauseStations,
            target,
            ServiceData::PauseStations {
                pause_duration: seconds,
            },
        )
    }

    /// The call a validated delay dialog produces.
    #[must_use]
    pub fn from_delay(target: impl Into<String>, delay: DelayInput) -> Self {
        match delay {
            DelayInput::RainDelayHours(hours) => Self::set_rain_delay(target, hours),
            DelayInput::PauseSeconds(seconds) => Self::pause_stations(target, seconds),
        }
    }

    /// Service data as the host expects it: `entity_id` plus the payload.
    #[must_use]
    pub fn service_data(&self) -> serde_json::Value {
        let mut data = serde_json::json!({ "entity_id": self.entity_id });
        if let (Some(map), Ok(serde_json::Value::Object(extra))) =
            (data.as_object_mut(), serde_json::to_value(self.data))
        {
            map.extend(extra);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_stop_call_without_payload() {
        let call = ServiceCall::stop("sensor.front_lawn_station_status");
        assert_eq!(call.domain, "opensprinkler");
        assert_eq!(call.service, Service::Stop);
        assert_eq!(
            call.service_data(),
            serde_json::json!({"entity_id": "sensor.front_lawn_station_status"})
        );
    }

    #[test]
    fn should_convert_run_minutes_into_seconds() {
        let duration = RunDuration::from_minutes(30).unwrap();
        let call = ServiceCall::run("sensor.front_lawn_station_status", duration);
        assert_eq!(call.data, ServiceData::Run { run_seconds: 1800 });
        assert_eq!(
            call.service_data(),
            serde_json::json!({
                "entity_id": "sensor.front_lawn_station_status",
                "run_seconds": 1800
            })
        );
    }

    #[test]
    fn should_map_delay_inputs_to_services() {
        let rain = ServiceCall::from_delay("sensor.x", DelayInput::RainDelayHours(24));
        assert_eq!(rain.service, Service::SetRainDelay);
        assert_eq!(rain.service_data()["rain_delay"], 24);

        let pause = ServiceCall::from_delay("sensor.y", DelayInput::PauseSeconds(600));
        assert_eq!(pause.service.as_str(), "pause_stations");
        assert_eq!(pause.service_data()["pause_duration"], 600);
    }

    #[test]
    fn should_mint_distinct_call_ids() {
        let a = ServiceCall::stop("sensor.a");
        let b = ServiceCall::stop("sensor.a");
        assert_ne!(a.id, b.id);
    }
}
