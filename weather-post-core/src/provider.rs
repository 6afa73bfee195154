use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

pub use openweather::{CurrentResponse, ForecastResponse, OpenWeatherProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP 401, or a payload reporting an invalid key.
    #[error("provider rejected the API key")]
    Unauthorized,

    #[error("provider request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProviderError::Unauthorized)
    }
}

/// Source of live weather for a city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<CurrentResponse, ProviderError>;

    /// Multi-day forecast in three-hour steps.
    async fn forecast(&self, city: &str) -> Result<ForecastResponse, ProviderError>;

    /// Succeeds when the provider accepts the credential.
    async fn check_key(&self, city: &str) -> Result<(), ProviderError> {
        self.current(city).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unauthorized_is_flagged() {
        assert!(ProviderError::Unauthorized.is_unauthorized());
        let status = ProviderError::Status { status: 500, body: "boom".into() };
        assert!(!status.is_unauthorized());
        assert!(status.to_string().contains("status 500"));
    }
}
