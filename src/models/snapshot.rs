use super::condition::ConditionCategory;
use super::daily::DailyAggregate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions augmented with derived agronomic metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    /// Unrounded; rounding happens at display time
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub condition: ConditionCategory,
    pub description: String,
    pub wind_speed: f64,
    pub precipitation_mm: f64,
    pub uv_index: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_pct: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

/// Combined current + daily output where every record carries soil moisture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgriculturalReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentSnapshot>,
    pub daily: Vec<DailyAggregate>,
}

impl AgriculturalReport {
    /// Days with soil moisture under the given percentage
    pub fn dry_days(&self, threshold_pct: f64) -> Vec<&DailyAggregate> {
        self.daily
            .iter()
            .filter(|d| d.soil_moisture_pct.is_some_and(|m| m < threshold_pct))
            .collect()
    }
}
