use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single 3-hour forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_probability: f64, // 0.0-1.0
    pub wind_speed: f64,
    pub cloud_coverage_pct: f64,
    pub condition_code: u32,
    pub condition_text: String,
}

impl IntervalSample {
    pub fn validate(&self) -> Result<(), SampleError> {
        check_finite("temperature_c", self.temperature_c)?;
        check_finite("humidity_pct", self.humidity_pct)?;
        check_finite("cloud_coverage_pct", self.cloud_coverage_pct)?;
        check_finite("precipitation_probability", self.precipitation_probability)?;
        check_finite("wind_speed", self.wind_speed)?;
        Ok(())
    }
}

/// Observed conditions at the farm location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed: f64,
    pub cloud_coverage_pct: f64,
    pub condition_code: u32,
    pub condition_text: String,
    #[serde(default)]
    pub rain_last_hour_mm: f64,
}

impl CurrentConditions {
    pub fn validate(&self) -> Result<(), SampleError> {
        check_finite("temperature_c", self.temperature_c)?;
        check_finite("humidity_pct", self.humidity_pct)?;
        check_finite("cloud_coverage_pct", self.cloud_coverage_pct)?;
        check_finite("wind_speed", self.wind_speed)?;
        check_finite("rain_last_hour_mm", self.rain_last_hour_mm)?;
        Ok(())
    }
}

/// Why an upstream record was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("invalid timestamp {0}")]
    InvalidTimestamp(i64),
}

fn check_finite(field: &'static str, value: f64) -> Result<(), SampleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SampleError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IntervalSample {
        IntervalSample {
            timestamp: DateTime::from_timestamp(1_718_000_000, 0).unwrap(),
            temperature_c: 21.5,
            humidity_pct: 60.0,
            precipitation_probability: 0.2,
            wind_speed: 3.4,
            cloud_coverage_pct: 40.0,
            condition_code: 802,
            condition_text: "scattered clouds".into(),
        }
    }

    #[test]
    fn valid_sample_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn nan_temperature_rejected() {
        let mut s = sample();
        s.temperature_c = f64::NAN;
        assert!(matches!(
            s.validate(),
            Err(SampleError::NonFinite {
                field: "temperature_c",
                ..
            })
        ));
    }

    #[test]
    fn infinite_cloud_cover_rejected() {
        let mut s = sample();
        s.cloud_coverage_pct = f64::INFINITY;
        assert!(s.validate().is_err());

        s.cloud_coverage_pct = 10.0;
        s.humidity_pct = f64::NEG_INFINITY;
        assert!(s.validate().is_err());
    }

    #[test]
    fn current_rain_defaults_to_zero() {
        let json = r#"{
            "timestamp": "2024-06-10T12:00:00Z",
            "temperature_c": 18.0,
            "humidity_pct": 55.0,
            "wind_speed": 2.0,
            "cloud_coverage_pct": 20.0,
            "condition_code": 801,
            "condition_text": "few clouds"
        }"#;
        let current: CurrentConditions = serde_json::from_str(json).unwrap();
        assert_eq!(current.rain_last_hour_mm, 0.0);
        assert!(current.validate().is_ok());
    }
}
