use crate::config::OpenWeatherMapConfig;
use crate::error::{FarmCastError, Result};
use crate::models::{
    CurrentConditions, ForecastLocation, IntervalSample, ProviderForecast, SampleError,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures. Numeric fields are optional so a
// single incomplete item can be dropped without failing the whole response.
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    pop: Option<f64>, // probability of precipitation
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u32,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: Option<f64>, // cloudiness percentage
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    name: String,
    country: String,
    coord: OwmCoord,
    #[serde(default)]
    timezone: i32, // shift in seconds from UTC
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch 5-day/3-hour forecast from OpenWeatherMap
    pub async fn fetch_forecast(&self) -> Result<ProviderForecast> {
        let body = self.get("forecast").await?;
        let response: OwmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            FarmCastError::UpstreamUnavailable(format!(
                "Failed to parse OpenWeatherMap forecast: {}",
                e
            ))
        })?;

        Ok(convert_forecast(response))
    }

    /// Fetch current conditions from OpenWeatherMap
    pub async fn fetch_current(&self) -> Result<CurrentConditions> {
        let body = self.get("weather").await?;
        let response: OwmCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            FarmCastError::UpstreamUnavailable(format!(
                "Failed to parse OpenWeatherMap current weather: {}",
                e
            ))
        })?;

        Ok(convert_current(response)?)
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("weather"))
            .send()
            .await
            .map_err(|e| FarmCastError::UpstreamUnavailable(format!("OpenWeatherMap: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, endpoint, self.config.latitude, self.config.longitude, self.config.api_key
        )
    }

    async fn get(&self, endpoint: &str) -> Result<String> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| FarmCastError::UpstreamUnavailable(format!("OpenWeatherMap: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmCastError::UpstreamUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }
}

fn convert_forecast(response: OwmForecastResponse) -> ProviderForecast {
    let location = ForecastLocation {
        city: response.city.name,
        country: response.city.country,
        latitude: response.city.coord.lat,
        longitude: response.city.coord.lon,
    };

    let samples = response
        .list
        .iter()
        .filter_map(|item| match convert_forecast_item(item) {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!(dt = item.dt, error = %e, "Dropping incomplete OpenWeatherMap forecast item");
                None
            }
        })
        .collect();

    ProviderForecast {
        fetched_at: Utc::now(),
        location: Some(location),
        timezone_offset_secs: response.city.timezone,
        samples,
    }
}

fn convert_forecast_item(item: &OwmForecastItem) -> std::result::Result<IntervalSample, SampleError> {
    let (condition_code, condition_text) = primary_condition(&item.weather)?;

    Ok(IntervalSample {
        timestamp: timestamp(item.dt)?,
        temperature_c: item.main.temp.ok_or(SampleError::MissingField("main.temp"))?,
        humidity_pct: item
            .main
            .humidity
            .ok_or(SampleError::MissingField("main.humidity"))?,
        precipitation_probability: item.pop.ok_or(SampleError::MissingField("pop"))?,
        wind_speed: item
            .wind
            .as_ref()
            .and_then(|w| w.speed)
            .ok_or(SampleError::MissingField("wind.speed"))?,
        cloud_coverage_pct: item
            .clouds
            .as_ref()
            .and_then(|c| c.all)
            .ok_or(SampleError::MissingField("clouds.all"))?,
        condition_code,
        condition_text,
    })
}

fn convert_current(response: OwmCurrentResponse) -> std::result::Result<CurrentConditions, SampleError> {
    let (condition_code, condition_text) = primary_condition(&response.weather)?;

    Ok(CurrentConditions {
        timestamp: timestamp(response.dt)?,
        temperature_c: response
            .main
            .temp
            .ok_or(SampleError::MissingField("main.temp"))?,
        humidity_pct: response
            .main
            .humidity
            .ok_or(SampleError::MissingField("main.humidity"))?,
        wind_speed: response
            .wind
            .as_ref()
            .and_then(|w| w.speed)
            .ok_or(SampleError::MissingField("wind.speed"))?,
        cloud_coverage_pct: response
            .clouds
            .as_ref()
            .and_then(|c| c.all)
            .ok_or(SampleError::MissingField("clouds.all"))?,
        condition_code,
        condition_text,
        rain_last_hour_mm: response.rain.map(|r| r.one_hour).unwrap_or(0.0),
    })
}

fn primary_condition(weather: &[OwmWeather]) -> std::result::Result<(u32, String), SampleError> {
    weather
        .first()
        .map(|w| (w.id, w.description.clone()))
        .ok_or(SampleError::MissingField("weather"))
}

fn timestamp(dt: i64) -> std::result::Result<DateTime<Utc>, SampleError> {
    DateTime::from_timestamp(dt, 0).ok_or(SampleError::InvalidTimestamp(dt))
}
