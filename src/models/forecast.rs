use super::sample::IntervalSample;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Raw 5-day/3-hour series as delivered by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderForecast {
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<ForecastLocation>,
    /// Shift from UTC of the forecast location, in seconds
    #[serde(default)]
    pub timezone_offset_secs: i32,
    pub samples: Vec<IntervalSample>,
}

impl ProviderForecast {
    /// Offset of the location's local time, or UTC when the provider sent nonsense
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_secs).unwrap_or_else(|| {
            tracing::warn!(
                offset = self.timezone_offset_secs,
                "Provider timezone offset out of range, using UTC"
            );
            Utc.fix()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast(offset: i32) -> ProviderForecast {
        ProviderForecast {
            fetched_at: Utc::now(),
            location: None,
            timezone_offset_secs: offset,
            samples: Vec::new(),
        }
    }

    #[test]
    fn local_offset_from_provider() {
        assert_eq!(forecast(-18000).local_offset().local_minus_utc(), -18000);
        assert_eq!(forecast(0).local_offset().local_minus_utc(), 0);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        assert_eq!(forecast(90_000).local_offset().local_minus_utc(), 0);
    }
}
