use crate::error::{FarmCastError, Result};
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub openweathermap: Option<OpenWeatherMapConfig>,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Where one calendar day ends and the next begins when bucketing samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBoundary {
    #[default]
    Utc,
    /// Midnight at the forecast location, using the provider's timezone offset
    ProviderLocal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub day_boundary: DayBoundary,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u32,
}

fn default_ttl_minutes() -> u32 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(FarmCastError::Config(format!(
                "Config file not found at {:?}. Run `farmcast init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FarmCastError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&config_str)
    }

    pub fn parse(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        serde_yaml::from_str(&content)
            .map_err(|e| FarmCastError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/farmcast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FarmCastError::Config("Cannot determine config directory".into()))?
            .join("farmcast");
        Ok(config_dir.join("config.yaml"))
    }

    /// The OpenWeatherMap section, if present and switched on
    pub fn active_openweathermap(&self) -> Option<&OpenWeatherMapConfig> {
        self.openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up farmcast!");
        println!();

        println!("OpenWeatherMap (leave API key blank to work from --input files only)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| FarmCastError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Farm latitude")
                .default(39.83)
                .interact_text()
                .map_err(|e| FarmCastError::Config(format!("Input error: {}", e)))?;

            let longitude: f64 = Input::new()
                .with_prompt("  Farm longitude")
                .default(-75.87)
                .interact_text()
                .map_err(|e| FarmCastError::Config(format!("Input error: {}", e)))?;

            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                latitude,
                longitude,
                enabled: true,
            })
        };

        println!();

        println!("Daily aggregation");
        let boundary_index = Select::new()
            .with_prompt("  Day boundary")
            .items(&["UTC midnight", "Local midnight at the farm"])
            .default(0)
            .interact()
            .map_err(|e| FarmCastError::Config(format!("Input error: {}", e)))?;
        let day_boundary = if boundary_index == 0 {
            DayBoundary::Utc
        } else {
            DayBoundary::ProviderLocal
        };

        let ttl_minutes: u32 = Input::new()
            .with_prompt("  Cache lifetime (minutes, 0 disables)")
            .default(default_ttl_minutes())
            .interact_text()
            .map_err(|e| FarmCastError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            openweathermap,
            aggregation: AggregationConfig { day_boundary },
            cache: CacheConfig {
                enabled: ttl_minutes > 0,
                ttl_minutes,
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| FarmCastError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# farmcast configuration\n# Generated by `farmcast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"));

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        // Then check env var
        if let Ok(dir) = std::env::var("FARMCAST_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        // Use XDG data directory
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FarmCastError::Config("Cannot determine data directory".into()))?
            .join("farmcast");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("farmcast.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert!(config.openweathermap.is_none());
        assert_eq!(config.aggregation.day_boundary, DayBoundary::Utc);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_minutes, 30);
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
openweathermap:
  api_key: abc123
  latitude: 39.85
  longitude: -75.71
aggregation:
  day_boundary: provider_local
cache:
  enabled: false
  ttl_minutes: 5
"#;
        let config = Config::parse(yaml).unwrap();
        let owm = config.active_openweathermap().unwrap();
        assert_eq!(owm.api_key, "abc123");
        assert!(owm.enabled);
        assert_eq!(config.aggregation.day_boundary, DayBoundary::ProviderLocal);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_minutes, 5);
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("FARMCAST_TEST_OWM_KEY", "from-env");
        let yaml = r#"
openweathermap:
  api_key: ${FARMCAST_TEST_OWM_KEY}
  latitude: 1.0
  longitude: 2.0
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.openweathermap.unwrap().api_key, "from-env");
    }

    #[test]
    fn disabled_or_keyless_owm_is_inactive() {
        let yaml = r#"
openweathermap:
  api_key: ""
  latitude: 1.0
  longitude: 2.0
"#;
        assert!(Config::parse(yaml).unwrap().active_openweathermap().is_none());

        let yaml = r#"
openweathermap:
  api_key: key
  latitude: 1.0
  longitude: 2.0
  enabled: false
"#;
        assert!(Config::parse(yaml).unwrap().active_openweathermap().is_none());
    }

    #[test]
    fn debug_redacts_api_key() {
        let owm = OpenWeatherMapConfig {
            api_key: "secret".into(),
            latitude: 0.0,
            longitude: 0.0,
            enabled: true,
        };
        let debug = format!("{:?}", owm);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        assert!(matches!(
            Config::parse("cache: [unclosed"),
            Err(FarmCastError::Config(_))
        ));
    }
}
