use super::engine::WeatherEngine;
use crate::config::{Config, DayBoundary};
use crate::datasources::{OpenWeatherMapClient, WeatherFile};
use crate::db::{CacheKind, Database};
use crate::error::{FarmCastError, Result};
use crate::models::{CurrentConditions, ProviderForecast};
use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Feeds the engine from an input file or OpenWeatherMap, with an SQLite cache in
/// front of the network.
pub struct DataSyncService {
    config: Config,
    db: Option<Database>,
    openweathermap_client: Option<OpenWeatherMapClient>,
    input: Option<WeatherFile>,
    read_cache: bool,
}

impl DataSyncService {
    pub fn new(config: Config, db: Option<Database>) -> Self {
        // Create OpenWeatherMap client if configured and enabled
        let openweathermap_client = config.active_openweathermap().map(|c| {
            tracing::info!("OpenWeatherMap client configured");
            OpenWeatherMapClient::new(c.clone())
        });

        if openweathermap_client.is_none() {
            tracing::info!("OpenWeatherMap not configured - only --input files can be used");
        }

        let read_cache = config.cache.enabled;

        Self {
            config,
            db,
            openweathermap_client,
            input: None,
            read_cache,
        }
    }

    /// Serve everything from a local file instead of the network
    pub fn with_input(mut self, input: WeatherFile) -> Self {
        self.input = Some(input);
        self
    }

    /// Skip cache reads; fresh responses are still written back
    pub fn bypass_cache(mut self) -> Self {
        self.read_cache = false;
        self
    }

    pub async fn load_forecast(&mut self) -> Result<ProviderForecast> {
        if let Some(ref mut input) = self.input {
            return Ok(input.forecast());
        }

        let client = self.client()?;
        let (lat, lon) = self.coordinates();
        if let Some(cached) = self.cached::<ProviderForecast>(CacheKind::Forecast, lat, lon) {
            return Ok(cached);
        }

        let forecast = client.fetch_forecast().await?;
        tracing::info!(samples = forecast.samples.len(), "Fetched forecast from OpenWeatherMap");
        self.store(CacheKind::Forecast, lat, lon, &forecast);
        Ok(forecast)
    }

    pub async fn load_current(&mut self) -> Result<Option<CurrentConditions>> {
        if let Some(ref mut input) = self.input {
            return input.current();
        }

        let client = self.client()?;
        let (lat, lon) = self.coordinates();
        if let Some(cached) = self.cached::<CurrentConditions>(CacheKind::Current, lat, lon) {
            return Ok(Some(cached));
        }

        let current = client.fetch_current().await?;
        tracing::info!("Fetched current conditions from OpenWeatherMap");
        self.store(CacheKind::Current, lat, lon, &current);
        Ok(Some(current))
    }

    /// Engine whose day boundary follows the configured policy
    pub fn engine_for(&self, forecast: &ProviderForecast) -> WeatherEngine {
        match self.config.aggregation.day_boundary {
            DayBoundary::Utc => WeatherEngine::new(),
            DayBoundary::ProviderLocal => {
                WeatherEngine::new().with_day_offset(forecast.local_offset())
            }
        }
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus {
            cache: self.db.is_some(),
            ..Default::default()
        };

        if let Some(ref client) = self.openweathermap_client {
            status.openweathermap = client.test_connection().await.unwrap_or(false);
        }

        status
    }

    fn client(&self) -> Result<&OpenWeatherMapClient> {
        self.openweathermap_client.as_ref().ok_or_else(|| {
            FarmCastError::Config(
                "OpenWeatherMap is not configured; run `farmcast init` or pass --input".into(),
            )
        })
    }

    fn coordinates(&self) -> (f64, f64) {
        self.config
            .openweathermap
            .as_ref()
            .map(|c| (c.latitude, c.longitude))
            .unwrap_or_default()
    }

    fn cached<T: DeserializeOwned>(&self, kind: CacheKind, lat: f64, lon: f64) -> Option<T> {
        if !self.read_cache {
            return None;
        }
        let db = self.db.as_ref()?;
        let max_age = Duration::minutes(i64::from(self.config.cache.ttl_minutes));
        match db.get_cached(kind, lat, lon, max_age) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read weather cache: {}", e);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, kind: CacheKind, lat: f64, lon: f64, value: &T) {
        let Some(ref db) = self.db else {
            return;
        };
        if let Err(e) = db.store_cached(kind, lat, lon, value) {
            tracing::warn!("Failed to cache weather data: {}", e);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub openweathermap: bool,
    pub cache: bool,
}
