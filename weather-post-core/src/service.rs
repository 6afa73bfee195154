use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    cache::{CacheStore, MemoryStore, RedisStore, WeatherCache},
    config::{CacheConfig, Config},
    key_state::ApiKeyState,
    mock::MockGenerator,
    model::WeatherSnapshot,
    provider::{OpenWeatherProvider, WeatherProvider},
    resolver::Resolver,
    text::Templater,
};

/// A ready-to-publish card: weather plus the Burmese message.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherPost {
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
    pub text: String,
}

/// Entry point used by binaries. Never fails once constructed.
#[derive(Debug)]
pub struct WeatherService {
    resolver: Resolver,
    mock: MockGenerator,
    templater: Templater,
}

impl WeatherService {
    pub fn new(resolver: Resolver, mock: MockGenerator, templater: Templater) -> Self {
        Self { resolver, mock, templater }
    }

    /// Wire up provider, cache backend and key state from configuration.
    ///
    /// An unreachable Redis is not fatal: the service falls back to the
    /// in-memory store.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let provider: Option<Arc<dyn WeatherProvider>> = match config.api_key() {
            Some(key) => {
                let provider =
                    OpenWeatherProvider::with_options(key.to_string(), &config.base_url, config.timeout())
                        .context("Failed to build OpenWeather client")?;
                Some(Arc::new(provider))
            }
            None => {
                info!("No OpenWeather API key configured, posts will use mock data");
                None
            }
        };

        let store: Arc<dyn CacheStore> = match &config.cache {
            CacheConfig::Memory => Arc::new(MemoryStore::new()),
            CacheConfig::Redis { url } => match RedisStore::connect(url, config.timeout()).await {
                Ok(store) => Arc::new(store),
                Err(err) => {
                    warn!(error = %err, "Redis unavailable, falling back to in-memory cache");
                    Arc::new(MemoryStore::new())
                }
            },
        };

        let resolver = Resolver::new(provider, WeatherCache::new(store), Arc::new(ApiKeyState::new()));
        Ok(Self::new(resolver, MockGenerator::default(), Templater::default()))
    }

    /// Live weather when available, otherwise generated data.
    pub async fn weather(&self, city: &str, force_refresh: bool) -> WeatherSnapshot {
        match self.resolver.resolve(city, force_refresh).await {
            Some(snapshot) => snapshot,
            None => self.mock.generate(city),
        }
    }

    pub async fn post(&self, city: &str, force_refresh: bool) -> WeatherPost {
        let snapshot = self.weather(city, force_refresh).await;
        let text = self.templater.render(
            &snapshot.city,
            snapshot.condition,
            snapshot.time,
            snapshot.temperature,
        );
        WeatherPost { snapshot, text }
    }

    pub async fn clear_cache(&self, city: &str) {
        self.resolver.clear_cache(city).await;
    }

    pub async fn is_key_valid(&self) -> bool {
        self.resolver.is_key_valid().await
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}
