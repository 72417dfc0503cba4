//! Temperature telemetry from `GET /brews/temperature_logs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::timestamp;

/// A single temperature reading reported by the brewing controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureSample {
    /// When the controller recorded the reading.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub recorded_at: DateTime<Utc>,
    /// Reading in degrees Celsius.
    pub temperature_celsius: f64,
}

/// Returns the most recent sample of an append-only log.
#[must_use]
pub fn latest(samples: &[TemperatureSample]) -> Option<&TemperatureSample> {
    samples.last()
}

/// Rounds a reading to two decimals for display.
#[must_use]
pub fn display_celsius(value: f64) -> String {
    format!("{value:.2}°C")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_log_and_picks_last() {
        let json = r#"[
            {"recorded_at": "2024-05-01T10:00:00Z", "temperature_celsius": 64.5},
            {"recorded_at": "2024-05-01T10:00:10", "temperature_celsius": 65.126}
        ]"#;
        let Ok(samples) = serde_json::from_str::<Vec<TemperatureSample>>(json) else {
            panic!("log should decode");
        };
        let Some(last) = latest(&samples) else {
            panic!("log is not empty");
        };
        assert!((last.temperature_celsius - 65.126).abs() < f64::EPSILON);
        assert_eq!(display_celsius(last.temperature_celsius), "65.13°C");
    }

    #[test]
    fn empty_log_has_no_latest() {
        assert!(latest(&[]).is_none());
    }

    #[test]
    fn non_numeric_reading_fails_closed() {
        let json = r#"[{"recorded_at": "2024-05-01T10:00:00Z", "temperature_celsius": "hot"}]"#;
        assert!(serde_json::from_str::<Vec<TemperatureSample>>(json).is_err());
    }
}
