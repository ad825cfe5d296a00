use super::condition::ConditionCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of forecast samples reduced to agronomic indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,
    pub humidity_pct: f64,
    /// Worst case over the day, not the mean
    pub precipitation_probability_pct: f64,
    pub wind_speed: f64,
    pub condition: ConditionCategory,
    pub description: String,
    pub uv_index: f64,
    /// Only populated for agricultural reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_pct: Option<f64>,
}

impl DailyAggregate {
    /// Whether rain is more likely than not at some point in the day
    pub fn rain_likely(&self) -> bool {
        self.precipitation_probability_pct >= 50.0
    }
}
