//! Key-value caching for resolved weather.
//!
//! The resolver only talks to [`WeatherCache`], which wraps any [`CacheStore`]:
//! - [`MemoryStore`]: in-process TTL cache
//! - [`RedisStore`]: external Redis instance shared between processes
//!
//! Store failures never reach callers. Reads degrade to misses and writes to no-ops.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt::Debug, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{HourlyPoint, WeatherSnapshot};

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl From<::redis::RedisError> for CacheError {
    fn from(err: ::redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Returns `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Insert or overwrite, resetting the TTL.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn ping(&self) -> bool;
}

/// Entry categories and their lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCategory {
    Weather,
    Forecast,
    Icon,
}

impl CacheCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            CacheCategory::Weather => "weather",
            CacheCategory::Forecast => "forecast",
            CacheCategory::Icon => "icon",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            CacheCategory::Weather => Duration::from_secs(30 * 60),
            CacheCategory::Forecast => Duration::from_secs(60 * 60),
            CacheCategory::Icon => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    /// City keys are lowercased so `Yangon` and `yangon` share an entry.
    pub fn key(&self, id: &str) -> String {
        match self {
            CacheCategory::Icon => format!("{}:{id}", self.prefix()),
            _ => format!("{}:{}", self.prefix(), id.to_lowercase()),
        }
    }
}

/// Typed access to the weather, forecast and icon categories.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    store: Arc<dyn CacheStore>,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Cache backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn weather(&self, city: &str) -> Option<WeatherSnapshot> {
        self.read(CacheCategory::Weather, city).await
    }

    pub async fn store_weather(&self, city: &str, snapshot: &WeatherSnapshot) {
        self.write(CacheCategory::Weather, city, snapshot).await;
    }

    pub async fn forecast(&self, city: &str) -> Option<Vec<HourlyPoint>> {
        self.read(CacheCategory::Forecast, city).await
    }

    pub async fn store_forecast(&self, city: &str, points: &[HourlyPoint]) {
        self.write(CacheCategory::Forecast, city, points).await;
    }

    pub async fn icon(&self, icon_code: &str) -> Option<String> {
        let key = CacheCategory::Icon.key(icon_code);
        match self.store.get(&key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "Cache read failed");
                None
            }
        }
    }

    pub async fn store_icon(&self, icon_code: &str, data: &str) {
        let key = CacheCategory::Icon.key(icon_code);
        if let Err(err) = self.store.set(&key, data.to_string(), CacheCategory::Icon.ttl()).await {
            warn!(key = %key, error = %err, "Cache write failed");
        }
    }

    /// Drop both the weather and the forecast entry of a city.
    pub async fn clear_city(&self, city: &str) {
        for category in [CacheCategory::Weather, CacheCategory::Forecast] {
            let key = category.key(city);
            if let Err(err) = self.store.delete(&key).await {
                warn!(key = %key, error = %err, "Cache delete failed");
            }
        }
    }

    pub async fn ping(&self) -> bool {
        self.store.ping().await
    }

    async fn read<T: DeserializeOwned>(&self, category: CacheCategory, id: &str) -> Option<T> {
        let key = category.key(id);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                return None;
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, category: CacheCategory, id: &str, value: &T) {
        let key = category.key(id);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to encode cache entry");
                return;
            }
        };

        if let Err(err) = self.store.set(&key, raw, category.ttl()).await {
            warn!(key = %key, error = %err, "Cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{condition::Condition, model::TimeOfDay};

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }

        async fn ping(&self) -> bool {
            false
        }
    }

    fn snapshot(city: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            city: city.to_string(),
            temperature: 29,
            condition: Condition::Clouds,
            humidity: 65,
            wind_speed: 11,
            time: TimeOfDay::Morning,
            description: "scattered clouds".into(),
            is_real_data: true,
            last_updated: "Oct 14, 08:00 AM".into(),
            icon: Some("03d".into()),
            weather_code: Some(802),
            hourly_forecast: None,
        }
    }

    #[test]
    fn keys_use_category_and_lowercased_city() {
        assert_eq!(CacheCategory::Weather.key("Nay Pyi Taw"), "weather:nay pyi taw");
        assert_eq!(CacheCategory::Forecast.key("Yangon"), "forecast:yangon");
        assert_eq!(CacheCategory::Icon.key("10d"), "icon:10d");
    }

    #[test]
    fn category_ttls() {
        assert_eq!(CacheCategory::Weather.ttl(), Duration::from_secs(1800));
        assert_eq!(CacheCategory::Forecast.ttl(), Duration::from_secs(3600));
        assert_eq!(CacheCategory::Icon.ttl(), Duration::from_secs(604_800));
    }

    #[tokio::test]
    async fn weather_round_trips_case_insensitively() {
        let cache = WeatherCache::in_memory();
        cache.store_weather("Yangon", &snapshot("Yangon")).await;

        let cached = cache.weather("YANGON").await.expect("cached snapshot");
        assert_eq!(cached, snapshot("Yangon"));
    }

    #[tokio::test]
    async fn clear_city_removes_weather_and_forecast() {
        let cache = WeatherCache::in_memory();
        cache.store_weather("Mandalay", &snapshot("Mandalay")).await;
        cache.store_forecast("Mandalay", &[]).await;

        cache.clear_city("Mandalay").await;

        assert!(cache.weather("Mandalay").await.is_none());
        assert!(cache.forecast("Mandalay").await.is_none());
    }

    #[tokio::test]
    async fn icon_entries_are_stored_verbatim() {
        let cache = WeatherCache::in_memory();
        cache.store_icon("10d", "<svg/>").await;
        assert_eq!(cache.icon("10d").await.as_deref(), Some("<svg/>"));
    }

    #[tokio::test]
    async fn undecodable_entries_are_misses() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("weather:yangon", "not json".into(), Duration::from_secs(60))
            .await
            .expect("memory set");

        let cache = WeatherCache::new(store);
        assert!(cache.weather("Yangon").await.is_none());
    }

    #[tokio::test]
    async fn backend_failures_degrade_silently() {
        let cache = WeatherCache::new(Arc::new(BrokenStore));

        cache.store_weather("Bangkok", &snapshot("Bangkok")).await;
        assert!(cache.weather("Bangkok").await.is_none());
        assert!(cache.icon("01d").await.is_none());
        cache.clear_city("Bangkok").await;
        assert!(!cache.ping().await);
    }
}
