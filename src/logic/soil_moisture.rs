/// Moisture percentage assumed with no rain at 50% humidity and 20°C
const BASELINE_PCT: f64 = 40.0;
const RAIN_WEIGHT: f64 = 20.0;
const HUMIDITY_MIDPOINT_PCT: f64 = 50.0;
const HUMIDITY_WEIGHT: f64 = 0.2;
const TEMPERATURE_BASELINE_C: f64 = 20.0;
const EVAPORATION_WEIGHT: f64 = 0.5;

/// Derives a 0-100 topsoil moisture estimate
pub trait SoilMoistureEstimator: Send + Sync {
    /// `rain_amount` is last-hour rainfall in mm for current conditions, or the
    /// day's peak precipitation probability as a 0-1 fraction for daily records.
    fn estimate(&self, rain_amount: f64, humidity_pct: f64, temperature_c: f64) -> f64;
}

/// Linear rain/humidity/heat heuristic, clamped to 0-100
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSoilMoistureEstimator;

impl SoilMoistureEstimator for HeuristicSoilMoistureEstimator {
    fn estimate(&self, rain_amount: f64, humidity_pct: f64, temperature_c: f64) -> f64 {
        let moisture = BASELINE_PCT + rain_amount * RAIN_WEIGHT
            + (humidity_pct - HUMIDITY_MIDPOINT_PCT) * HUMIDITY_WEIGHT
            - (temperature_c - TEMPERATURE_BASELINE_C) * EVAPORATION_WEIGHT;

        moisture.clamp(0.0, 100.0)
    }
}
