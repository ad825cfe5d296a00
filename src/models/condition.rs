use serde::{Deserialize, Serialize};

/// Sky condition categories derived from OpenWeatherMap condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConditionCategory {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    /// Mist, smoke, haze, dust, fog
    Atmosphere,
    Clear,
    Clouds,
    #[default]
    Unknown,
}

impl ConditionCategory {
    /// Classify a provider condition code.
    ///
    /// Codes 400-499 are unassigned upstream and fall through to `Unknown`.
    pub fn from_code(code: u32) -> Self {
        match code {
            200..=299 => ConditionCategory::Thunderstorm,
            300..=399 => ConditionCategory::Drizzle,
            500..=599 => ConditionCategory::Rain,
            600..=699 => ConditionCategory::Snow,
            700..=799 => ConditionCategory::Atmosphere,
            800 => ConditionCategory::Clear,
            801..=899 => ConditionCategory::Clouds,
            _ => ConditionCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Atmosphere => "Atmosphere",
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Unknown => "Unknown",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ConditionCategory::Thunderstorm => "⛈",
            ConditionCategory::Drizzle => "🌦",
            ConditionCategory::Rain => "🌧",
            ConditionCategory::Snow => "❄",
            ConditionCategory::Atmosphere => "🌫",
            ConditionCategory::Clear => "☀",
            ConditionCategory::Clouds => "☁",
            ConditionCategory::Unknown => "?",
        }
    }
}

impl std::fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a provider condition code to a category
pub trait ConditionClassifier: Send + Sync {
    fn classify(&self, code: u32) -> ConditionCategory;
}

/// Classifier for the OpenWeatherMap code table
#[derive(Debug, Clone, Copy, Default)]
pub struct OwmConditionClassifier;

impl ConditionClassifier for OwmConditionClassifier {
    fn classify(&self, code: u32) -> ConditionCategory {
        ConditionCategory::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_codes() {
        let classifier = OwmConditionClassifier;
        assert_eq!(classifier.classify(800), ConditionCategory::Clear);
        assert_eq!(classifier.classify(250), ConditionCategory::Thunderstorm);
        assert_eq!(classifier.classify(801), ConditionCategory::Clouds);
        assert_eq!(classifier.classify(311), ConditionCategory::Drizzle);
        assert_eq!(classifier.classify(502), ConditionCategory::Rain);
        assert_eq!(classifier.classify(601), ConditionCategory::Snow);
        assert_eq!(classifier.classify(741), ConditionCategory::Atmosphere);
    }

    #[test]
    fn classify_range_edges() {
        assert_eq!(ConditionCategory::from_code(200), ConditionCategory::Thunderstorm);
        assert_eq!(ConditionCategory::from_code(299), ConditionCategory::Thunderstorm);
        assert_eq!(ConditionCategory::from_code(300), ConditionCategory::Drizzle);
        assert_eq!(ConditionCategory::from_code(799), ConditionCategory::Atmosphere);
        assert_eq!(ConditionCategory::from_code(899), ConditionCategory::Clouds);
        assert_eq!(ConditionCategory::from_code(900), ConditionCategory::Unknown);
        assert_eq!(ConditionCategory::from_code(199), ConditionCategory::Unknown);
        assert_eq!(ConditionCategory::from_code(0), ConditionCategory::Unknown);
    }

    #[test]
    fn classify_unassigned_400_band_is_unknown() {
        assert_eq!(ConditionCategory::from_code(400), ConditionCategory::Unknown);
        assert_eq!(ConditionCategory::from_code(450), ConditionCategory::Unknown);
        assert_eq!(ConditionCategory::from_code(499), ConditionCategory::Unknown);
    }

    #[test]
    fn category_display() {
        assert_eq!(ConditionCategory::Clear.to_string(), "Clear");
        assert_eq!(ConditionCategory::Atmosphere.as_str(), "Atmosphere");
    }
}
