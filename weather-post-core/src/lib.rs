//! Core library for the `weather-post` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and the cache backends in front of it
//! - Resolution of live weather with mock fallback
//! - Burmese post text for each city card
//!
//! It is used by `weather-post-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod city;
pub mod condition;
pub mod config;
pub mod key_state;
pub mod mock;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod service;
pub mod text;

pub use cache::{CacheStore, MemoryStore, RedisStore, WeatherCache};
pub use city::City;
pub use condition::{Condition, condition_text, icon_asset};
pub use config::{CacheConfig, Config};
pub use key_state::ApiKeyState;
pub use mock::MockGenerator;
pub use model::{HourlyPoint, TimeOfDay, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, ProviderError, WeatherProvider};
pub use resolver::Resolver;
pub use service::{WeatherPost, WeatherService};
pub use text::Templater;
