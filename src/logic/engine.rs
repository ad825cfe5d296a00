use super::aggregation::{DailyAggregator, Variant};
use super::grouping::DailyGrouper;
use super::snapshot::CurrentSnapshotBuilder;
use super::soil_moisture::{HeuristicSoilMoistureEstimator, SoilMoistureEstimator};
use super::uv::{HeuristicUvEstimator, UvEstimator};
use crate::error::Result;
use crate::models::{
    AgriculturalReport, ConditionClassifier, CurrentConditions, CurrentSnapshot,
    DailyAggregate, IntervalSample, OwmConditionClassifier,
};
use chrono::{FixedOffset, Utc};
use tracing::warn;

/// Entry point to the aggregation pipeline.
///
/// Holds the classifier and estimators as trait objects so any of them can be
/// swapped out. Stateless between calls and safe to share across threads.
pub struct WeatherEngine {
    classifier: Box<dyn ConditionClassifier>,
    uv: Box<dyn UvEstimator>,
    soil: Box<dyn SoilMoistureEstimator>,
    grouper: DailyGrouper,
}

impl WeatherEngine {
    pub fn new() -> Self {
        Self {
            classifier: Box::new(OwmConditionClassifier),
            uv: Box::new(HeuristicUvEstimator),
            soil: Box::new(HeuristicSoilMoistureEstimator),
            grouper: DailyGrouper::utc(),
        }
    }

    pub fn with_day_offset(mut self, offset: FixedOffset) -> Self {
        self.grouper = DailyGrouper::new(offset);
        self
    }

    #[allow(dead_code)]
    pub fn with_classifier(mut self, classifier: Box<dyn ConditionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    #[allow(dead_code)]
    pub fn with_uv_estimator(mut self, uv: Box<dyn UvEstimator>) -> Self {
        self.uv = uv;
        self
    }

    #[allow(dead_code)]
    pub fn with_soil_moisture_estimator(mut self, soil: Box<dyn SoilMoistureEstimator>) -> Self {
        self.soil = soil;
        self
    }

    /// Daily records without soil moisture
    pub fn daily_forecast(&self, samples: &[IntervalSample]) -> Vec<DailyAggregate> {
        self.daily(samples, Variant::Forecast)
    }

    /// Plain current snapshot
    pub fn current(&self, current: &CurrentConditions) -> Result<CurrentSnapshot> {
        current.validate()?;
        Ok(self.snapshot_builder().build(current, false))
    }

    /// Current snapshot and daily records, all carrying soil moisture
    pub fn agricultural_report(
        &self,
        samples: &[IntervalSample],
        current: Option<&CurrentConditions>,
    ) -> Result<AgriculturalReport> {
        let current = match current {
            Some(c) => {
                c.validate()?;
                Some(self.snapshot_builder().build(c, true))
            }
            None => None,
        };

        Ok(AgriculturalReport {
            generated_at: Utc::now(),
            current,
            daily: self.daily(samples, Variant::Agricultural),
        })
    }

    fn daily(&self, samples: &[IntervalSample], variant: Variant) -> Vec<DailyAggregate> {
        let valid = valid_samples(samples);
        let aggregator = DailyAggregator::new(
            self.classifier.as_ref(),
            self.uv.as_ref(),
            self.soil.as_ref(),
        );

        let buckets = self.grouper.group(&valid);
        buckets
            .iter()
            .filter_map(|bucket| aggregator.aggregate(bucket, variant))
            .collect()
    }

    fn snapshot_builder(&self) -> CurrentSnapshotBuilder<'_> {
        CurrentSnapshotBuilder::new(self.classifier.as_ref(), self.uv.as_ref(), self.soil.as_ref())
    }
}

impl Default for WeatherEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops samples with non-finite readings so they cannot poison the averages
fn valid_samples(samples: &[IntervalSample]) -> Vec<IntervalSample> {
    samples
        .iter()
        .filter(|sample| match sample.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(timestamp = %sample.timestamp, error = %e, "Skipping malformed forecast sample");
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmCastError;
    use crate::models::ConditionCategory;
    use chrono::{DateTime, NaiveDate, TimeZone};

    fn sample(
        timestamp: DateTime<Utc>,
        temp: f64,
        humidity: f64,
        pop: f64,
        code: u32,
    ) -> IntervalSample {
        IntervalSample {
            timestamp,
            temperature_c: temp,
            humidity_pct: humidity,
            precipitation_probability: pop,
            wind_speed: 3.0,
            cloud_coverage_pct: 20.0,
            condition_code: code,
            condition_text: ConditionCategory::from_code(code).as_str().to_lowercase(),
        }
    }

    fn five_day_series() -> Vec<IntervalSample> {
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        (0..40)
            .map(|i| {
                let t = start + chrono::Duration::hours(3 * i);
                sample(t, 15.0 + (i % 8) as f64, 55.0, 0.1, 800)
            })
            .collect()
    }

    fn current() -> CurrentConditions {
        CurrentConditions {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap(),
            temperature_c: 20.0,
            humidity_pct: 50.0,
            wind_speed: 1.0,
            cloud_coverage_pct: 0.0,
            condition_code: 800,
            condition_text: "clear sky".into(),
            rain_last_hour_mm: 0.0,
        }
    }

    struct FixedUv(f64);

    impl UvEstimator for FixedUv {
        fn estimate(&self, _condition_code: u32, _cloud_coverage_pct: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn end_to_end_single_day() {
        let t = Utc.with_ymd_and_hms(2024, 6, 10, 6, 0, 0).unwrap();
        let samples = vec![
            sample(t, 20.0, 60.0, 0.1, 800),
            sample(t + chrono::Duration::hours(3), 25.0, 70.0, 0.5, 800),
            sample(t + chrono::Duration::hours(6), 22.0, 65.0, 0.2, 801),
        ];
        let days = WeatherEngine::new().daily_forecast(&samples);

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(day.temperature_min_c, 20.0);
        assert_eq!(day.temperature_max_c, 25.0);
        assert_eq!(day.humidity_pct, 65.0);
        assert_eq!(day.precipitation_probability_pct, 50.0);
        assert_eq!(day.condition, ConditionCategory::Clear);
    }

    #[test]
    fn one_record_per_distinct_date() {
        let samples = five_day_series();
        let days = WeatherEngine::new().daily_forecast(&samples);
        assert_eq!(days.len(), 5);
        for day in &days {
            assert!(day.temperature_min_c <= day.temperature_max_c);
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(WeatherEngine::new().daily_forecast(&[]).is_empty());
        let report = WeatherEngine::new().agricultural_report(&[], None).unwrap();
        assert!(report.daily.is_empty());
        assert!(report.current.is_none());
    }

    #[test]
    fn malformed_samples_are_skipped() {
        let mut samples = five_day_series();
        samples[0].temperature_c = f64::NAN;
        samples[1].humidity_pct = f64::INFINITY;

        let days = WeatherEngine::new().daily_forecast(&samples);
        assert_eq!(days.len(), 5);
        assert!(days[0].temperature_min_c.is_finite());
        assert!(days[0].humidity_pct.is_finite());
    }

    #[test]
    fn day_with_only_malformed_samples_is_omitted() {
        let mut samples = five_day_series();
        // Day 3 is samples 16..24
        for s in &mut samples[16..24] {
            s.cloud_coverage_pct = f64::NAN;
        }
        let days = WeatherEngine::new().daily_forecast(&samples);
        assert_eq!(days.len(), 4);
        assert!(days
            .iter()
            .all(|d| d.date != NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()));
    }

    #[test]
    fn agricultural_report_populates_soil_moisture() {
        let samples = five_day_series();
        let report = WeatherEngine::new()
            .agricultural_report(&samples, Some(&current()))
            .unwrap();

        assert_eq!(report.daily.len(), 5);
        assert!(report
            .daily
            .iter()
            .all(|d| d.soil_moisture_pct.is_some_and(|m| (0.0..=100.0).contains(&m))));
        let current = report.current.unwrap();
        assert_eq!(current.soil_moisture_pct, Some(40.0));
    }

    #[test]
    fn malformed_current_conditions_rejected() {
        let mut conditions = current();
        conditions.temperature_c = f64::NAN;
        let err = WeatherEngine::new().current(&conditions).unwrap_err();
        assert!(matches!(err, FarmCastError::MalformedSample(_)));
    }

    struct AlwaysSnow;

    impl ConditionClassifier for AlwaysSnow {
        fn classify(&self, _code: u32) -> ConditionCategory {
            ConditionCategory::Snow
        }
    }

    struct Saturated;

    impl SoilMoistureEstimator for Saturated {
        fn estimate(&self, _rain: f64, _humidity: f64, _temperature: f64) -> f64 {
            100.0
        }
    }

    #[test]
    fn estimators_can_be_substituted() {
        let engine = WeatherEngine::new()
            .with_uv_estimator(Box::new(FixedUv(9.9)))
            .with_classifier(Box::new(AlwaysSnow))
            .with_soil_moisture_estimator(Box::new(Saturated));

        let snapshot = engine.current(&current()).unwrap();
        assert_eq!(snapshot.uv_index, 9.9);
        assert_eq!(snapshot.condition, ConditionCategory::Snow);
        assert!(snapshot.soil_moisture_pct.is_none());

        let report = engine
            .agricultural_report(&five_day_series(), Some(&current()))
            .unwrap();
        assert!(report.daily.iter().all(|d| d.uv_index == 9.9));
        assert!(report.daily.iter().all(|d| d.soil_moisture_pct == Some(100.0)));
    }

    #[test]
    fn day_offset_changes_bucketing() {
        // 22:00 UTC on the 10th is already the 11th at UTC+3
        let t = Utc.with_ymd_and_hms(2024, 6, 10, 22, 0, 0).unwrap();
        let samples = vec![
            sample(t - chrono::Duration::hours(3), 20.0, 50.0, 0.0, 800),
            sample(t, 20.0, 50.0, 0.0, 800),
        ];
        let utc_days = WeatherEngine::new().daily_forecast(&samples);
        assert_eq!(utc_days.len(), 1);

        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let local_days = WeatherEngine::new()
            .with_day_offset(offset)
            .daily_forecast(&samples);
        assert_eq!(local_days.len(), 2);
        assert_eq!(local_days[1].date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
    }
}
