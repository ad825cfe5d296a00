use crate::db::Database;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Which upstream response a cache row holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Forecast,
    Current,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Forecast => "forecast",
            CacheKind::Current => "current",
        }
    }
}

// Weather Cache Queries

impl Database {
    pub fn store_cached<T: Serialize>(
        &self,
        kind: CacheKind,
        latitude: f64,
        longitude: f64,
        value: &T,
    ) -> Result<()> {
        self.store_cached_at(kind, latitude, longitude, value, Utc::now())
    }

    pub fn store_cached_at<T: Serialize>(
        &self,
        kind: CacheKind,
        latitude: f64,
        longitude: f64,
        value: &T,
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT OR REPLACE INTO weather_cache
                    (kind, latitude, longitude, payload, fetched_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    kind.as_str(),
                    latitude,
                    longitude,
                    payload,
                    fetched_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Cached value younger than `max_age`, if any.
    ///
    /// Rows that no longer deserialize are treated as a miss.
    pub fn get_cached<T: DeserializeOwned>(
        &self,
        kind: CacheKind,
        latitude: f64,
        longitude: f64,
        max_age: Duration,
    ) -> Result<Option<T>> {
        let row: Option<(String, String)> = self.with_conn(|conn| {
            conn.query_row(
                r#"
                SELECT payload, fetched_at FROM weather_cache
                WHERE kind = ?1 AND latitude = ?2 AND longitude = ?3
                "#,
                params![kind.as_str(), latitude, longitude],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(Into::into)
        })?;

        let Some((payload, fetched_at_str)) = row else {
            return Ok(None);
        };

        let fetched_at = match DateTime::parse_from_rfc3339(&fetched_at_str) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                warn!(fetched_at = %fetched_at_str, error = %e, "Unreadable cache timestamp");
                return Ok(None);
            }
        };

        if Utc::now() - fetched_at > max_age {
            debug!(kind = kind.as_str(), %fetched_at, "Cache entry expired");
            return Ok(None);
        }

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(kind = kind.as_str(), %fetched_at, "Serving weather from cache");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "Discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    /// Delete rows older than `max_age`; returns how many were removed
    pub fn purge_cache_older_than(&self, max_age: Duration) -> Result<usize> {
        let cutoff = (Utc::now() - max_age).to_rfc3339();
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM weather_cache WHERE fetched_at < ?1",
                [cutoff],
            )?;
            Ok(removed)
        })
    }
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderForecast;

    fn forecast() -> ProviderForecast {
        ProviderForecast {
            fetched_at: Utc::now(),
            location: None,
            timezone_offset_secs: -18000,
            samples: Vec::new(),
        }
    }

    #[test]
    fn round_trips_fresh_entry() {
        let db = Database::open_in_memory().unwrap();
        db.store_cached(CacheKind::Forecast, 39.8, -75.7, &forecast())
            .unwrap();

        let cached: Option<ProviderForecast> = db
            .get_cached(CacheKind::Forecast, 39.8, -75.7, Duration::minutes(30))
            .unwrap();
        assert_eq!(cached.unwrap().timezone_offset_secs, -18000);
    }

    #[test]
    fn miss_for_other_location_or_kind() {
        let db = Database::open_in_memory().unwrap();
        db.store_cached(CacheKind::Forecast, 39.8, -75.7, &forecast())
            .unwrap();

        let other_place: Option<ProviderForecast> = db
            .get_cached(CacheKind::Forecast, 40.0, -75.7, Duration::minutes(30))
            .unwrap();
        assert!(other_place.is_none());

        let other_kind: Option<ProviderForecast> = db
            .get_cached(CacheKind::Current, 39.8, -75.7, Duration::minutes(30))
            .unwrap();
        assert!(other_kind.is_none());
    }

    #[test]
    fn expired_entry_is_a_miss_and_purged() {
        let db = Database::open_in_memory().unwrap();
        let two_hours_ago = Utc::now() - Duration::hours(2);
        db.store_cached_at(CacheKind::Forecast, 39.8, -75.7, &forecast(), two_hours_ago)
            .unwrap();

        let cached: Option<ProviderForecast> = db
            .get_cached(CacheKind::Forecast, 39.8, -75.7, Duration::minutes(30))
            .unwrap();
        assert!(cached.is_none());

        assert_eq!(db.purge_cache_older_than(Duration::hours(1)).unwrap(), 1);
        assert_eq!(db.purge_cache_older_than(Duration::hours(1)).unwrap(), 0);
    }

    #[test]
    fn unreadable_payload_is_a_miss() {
        let db = Database::open_in_memory().unwrap();
        db.store_cached(CacheKind::Current, 1.0, 2.0, &"not a forecast")
            .unwrap();

        let cached: Option<ProviderForecast> = db
            .get_cached(CacheKind::Current, 1.0, 2.0, Duration::minutes(30))
            .unwrap();
        assert!(cached.is_none());
    }
}
