use super::stats::round_to;

/// Clear-sky UV used as the starting point for every estimate
pub const CLEAR_SKY_UV: f64 = 5.0;

/// Share of the clear-sky value that full cloud cover removes
const MAX_CLOUD_ATTENUATION: f64 = 0.75;

/// Multiplier applied while it is actively precipitating
const PRECIPITATION_FACTOR: f64 = 0.3;

/// Derives a UV index estimate from sky condition and cloud cover
pub trait UvEstimator: Send + Sync {
    fn estimate(&self, condition_code: u32, cloud_coverage_pct: f64) -> f64;
}

/// Linear cloud-cover heuristic.
///
/// Not clamped: the output stays within 0-5 only because cloud cover is a
/// percentage. Codes 200-699 (thunderstorm through snow) cut the result to 30%.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicUvEstimator;

impl UvEstimator for HeuristicUvEstimator {
    fn estimate(&self, condition_code: u32, cloud_coverage_pct: f64) -> f64 {
        let mut uv = CLEAR_SKY_UV * (1.0 - (cloud_coverage_pct / 100.0) * MAX_CLOUD_ATTENUATION);

        if (200..700).contains(&condition_code) {
            uv *= PRECIPITATION_FACTOR;
        }

        round_to(uv, 1)
    }
}
