use super::grouping::DayBucket;
use super::soil_moisture::SoilMoistureEstimator;
use super::stats::{max, mean, min, mode, round_to};
use super::uv::UvEstimator;
use crate::models::{ConditionClassifier, DailyAggregate};

/// Which daily record to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// UV from the dominant condition at zero cloud cover, no soil moisture
    Forecast,
    /// UV averaged over per-sample estimates, soil moisture populated
    Agricultural,
}

/// Reduces one day bucket to a `DailyAggregate`
pub struct DailyAggregator<'e> {
    classifier: &'e dyn ConditionClassifier,
    uv: &'e dyn UvEstimator,
    soil: &'e dyn SoilMoistureEstimator,
}

impl<'e> DailyAggregator<'e> {
    pub fn new(
        classifier: &'e dyn ConditionClassifier,
        uv: &'e dyn UvEstimator,
        soil: &'e dyn SoilMoistureEstimator,
    ) -> Self {
        Self {
            classifier,
            uv,
            soil,
        }
    }

    /// Returns `None` only for an empty bucket, which grouping never produces.
    pub fn aggregate(&self, bucket: &DayBucket<'_>, variant: Variant) -> Option<DailyAggregate> {
        let samples = &bucket.samples;

        let temperature_min_c = min(samples.iter().map(|s| s.temperature_c))?;
        let temperature_max_c = max(samples.iter().map(|s| s.temperature_c))?;
        let mean_temperature_c = mean(samples.iter().map(|s| s.temperature_c))?;
        let mean_humidity_pct = mean(samples.iter().map(|s| s.humidity_pct))?;
        let mean_wind_speed = mean(samples.iter().map(|s| s.wind_speed))?;
        let precipitation_probability_pct = round_to(
            max(samples.iter().map(|s| s.precipitation_probability * 100.0))?,
            0,
        );

        let dominant_code = mode(samples.iter().map(|s| s.condition_code))?;
        let description = mode(samples.iter().map(|s| s.condition_text.as_str()))?.to_string();

        let (uv_index, soil_moisture_pct) = match variant {
            Variant::Forecast => (self.uv.estimate(dominant_code, 0.0), None),
            Variant::Agricultural => {
                let uv = mean(
                    samples
                        .iter()
                        .map(|s| self.uv.estimate(s.condition_code, s.cloud_coverage_pct)),
                )?;
                let moisture = self.soil.estimate(
                    precipitation_probability_pct / 100.0,
                    mean_humidity_pct,
                    mean_temperature_c,
                );
                (round_to(uv, 1), Some(moisture))
            }
        };

        Some(DailyAggregate {
            date: bucket.date,
            temperature_min_c: round_to(temperature_min_c, 0),
            temperature_max_c: round_to(temperature_max_c, 0),
            humidity_pct: round_to(mean_humidity_pct, 0),
            precipitation_probability_pct,
            wind_speed: round_to(mean_wind_speed, 1),
            condition: self.classifier.classify(dominant_code),
            description,
            uv_index,
            soil_moisture_pct,
        })
    }
}
