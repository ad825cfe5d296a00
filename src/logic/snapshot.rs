use super::soil_moisture::SoilMoistureEstimator;
use super::uv::UvEstimator;
use crate::models::{ConditionClassifier, CurrentConditions, CurrentSnapshot};
use chrono::{DateTime, Utc};

/// Turns a current-conditions record into a snapshot with derived metrics
pub struct CurrentSnapshotBuilder<'e> {
    classifier: &'e dyn ConditionClassifier,
    uv: &'e dyn UvEstimator,
    soil: &'e dyn SoilMoistureEstimator,
}

impl<'e> CurrentSnapshotBuilder<'e> {
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

    pub fn build(&self, current: &CurrentConditions, with_soil_moisture: bool) -> CurrentSnapshot {
        self.build_at(current, with_soil_moisture, Utc::now())
    }

    pub fn build_at(
        &self,
        current: &CurrentConditions,
        with_soil_moisture: bool,
        observed_at: DateTime<Utc>,
    ) -> CurrentSnapshot {
        // Last-hour rainfall in mm goes straight into the rain term
        let soil_moisture_pct = with_soil_moisture.then(|| {
            self.soil.estimate(
                current.rain_last_hour_mm,
                current.humidity_pct,
                current.temperature_c,
            )
        });

        CurrentSnapshot {
            temperature_c: current.temperature_c,
            humidity_pct: current.humidity_pct,
            condition: self.classifier.classify(current.condition_code),
            description: current.condition_text.clone(),
            wind_speed: current.wind_speed,
            precipitation_mm: current.rain_last_hour_mm,
            uv_index: self
                .uv
                .estimate(current.condition_code, current.cloud_coverage_pct),
            soil_moisture_pct,
            observed_at,
        }
    }
}
