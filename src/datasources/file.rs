use crate::error::{FarmCastError, Result};
use crate::models::{CurrentConditions, IntervalSample, ProviderForecast, SampleError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Offline weather input, e.g. a saved provider export.
///
/// ```json
/// {
///   "timezone_offset_secs": -14400,
///   "samples": [{ "timestamp": "2024-06-10T00:00:00Z", "temperature_c": 18.2, ... }],
///   "current": { "timestamp": "2024-06-10T12:00:00Z", "temperature_c": 22.4, ... }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct WeatherFile {
    #[serde(default)]
    pub timezone_offset_secs: i32,
    #[serde(default)]
    samples: Vec<SampleRecord>,
    #[serde(default)]
    current: Option<CurrentRecord>,
}

#[derive(Debug, Deserialize)]
struct SampleRecord {
    timestamp: Option<DateTime<Utc>>,
    temperature_c: Option<f64>,
    humidity_pct: Option<f64>,
    precipitation_probability: Option<f64>,
    wind_speed: Option<f64>,
    cloud_coverage_pct: Option<f64>,
    condition_code: Option<u32>,
    #[serde(default)]
    condition_text: String,
}

#[derive(Debug, Deserialize)]
struct CurrentRecord {
    timestamp: Option<DateTime<Utc>>,
    temperature_c: Option<f64>,
    humidity_pct: Option<f64>,
    wind_speed: Option<f64>,
    cloud_coverage_pct: Option<f64>,
    condition_code: Option<u32>,
    #[serde(default)]
    condition_text: String,
    rain_last_hour_mm: Option<f64>,
}

impl TryFrom<SampleRecord> for IntervalSample {
    type Error = SampleError;

    fn try_from(record: SampleRecord) -> std::result::Result<Self, Self::Error> {
        Ok(IntervalSample {
            timestamp: record
                .timestamp
                .ok_or(SampleError::MissingField("timestamp"))?,
            temperature_c: record
                .temperature_c
                .ok_or(SampleError::MissingField("temperature_c"))?,
            humidity_pct: record
                .humidity_pct
                .ok_or(SampleError::MissingField("humidity_pct"))?,
            precipitation_probability: record
                .precipitation_probability
                .ok_or(SampleError::MissingField("precipitation_probability"))?,
            wind_speed: record
                .wind_speed
                .ok_or(SampleError::MissingField("wind_speed"))?,
            cloud_coverage_pct: record
                .cloud_coverage_pct
                .ok_or(SampleError::MissingField("cloud_coverage_pct"))?,
            condition_code: record
                .condition_code
                .ok_or(SampleError::MissingField("condition_code"))?,
            condition_text: record.condition_text,
        })
    }
}

impl TryFrom<CurrentRecord> for CurrentConditions {
    type Error = SampleError;

    fn try_from(record: CurrentRecord) -> std::result::Result<Self, Self::Error> {
        Ok(CurrentConditions {
            timestamp: record.timestamp.unwrap_or_else(Utc::now),
            temperature_c: record
                .temperature_c
                .ok_or(SampleError::MissingField("temperature_c"))?,
            humidity_pct: record
                .humidity_pct
                .ok_or(SampleError::MissingField("humidity_pct"))?,
            wind_speed: record
                .wind_speed
                .ok_or(SampleError::MissingField("wind_speed"))?,
            cloud_coverage_pct: record
                .cloud_coverage_pct
                .ok_or(SampleError::MissingField("cloud_coverage_pct"))?,
            condition_code: record
                .condition_code
                .ok_or(SampleError::MissingField("condition_code"))?,
            condition_text: record.condition_text,
            rain_last_hour_mm: record.rain_last_hour_mm.unwrap_or(0.0),
        })
    }
}

impl WeatherFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FarmCastError::InvalidData(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Forecast samples, skipping records with missing fields
    pub fn forecast(&mut self) -> ProviderForecast {
        let samples = std::mem::take(&mut self.samples)
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match IntervalSample::try_from(record) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    warn!(index, error = %e, "Dropping incomplete sample from input file");
                    None
                }
            })
            .collect();

        ProviderForecast {
            fetched_at: Utc::now(),
            location: None,
            timezone_offset_secs: self.timezone_offset_secs,
            samples,
        }
    }

    pub fn current(&mut self) -> Result<Option<CurrentConditions>> {
        match self.current.take() {
            Some(record) => Ok(Some(CurrentConditions::try_from(record)?)),
            None => Ok(None),
        }
    }
}
