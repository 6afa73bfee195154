use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Provider with a custom endpoint root and request timeout.
    pub fn with_options(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Body of a successful request, or the classified failure.
    async fn send(&self, endpoint: &str, city: &str) -> Result<String, ProviderError> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);
        debug!(endpoint, city, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_default();

            if status == StatusCode::UNAUTHORIZED || message.contains("Invalid API key") {
                return Err(ProviderError::Unauthorized);
            }

            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T, ProviderError> {
        let body = self.send(endpoint, city).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<CurrentResponse, ProviderError> {
        self.fetch("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<ForecastResponse, ProviderError> {
        self.fetch("forecast", city).await
    }

    async fn check_key(&self, city: &str) -> Result<(), ProviderError> {
        self.send("weather", city).await.map(|_| ())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub id: u16,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

/// Body of `/data/2.5/weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    #[serde(default)]
    pub name: String,
    pub dt: i64,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    #[serde(default)]
    pub wind: OwWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    #[serde(default)]
    pub wind: OwWind,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timezone: i32,
}

/// Body of `/data/2.5/forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub city: ForecastCity,
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorResponse {
    #[serde(default)]
    message: String,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_payload() {
        let body = r#"{
            "name": "Yangon",
            "dt": 1700000000,
            "timezone": 23400,
            "main": { "temp": 30.6, "humidity": 74, "pressure": 1008 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 5.0, "deg": 200 },
            "sys": { "country": "MM" }
        }"#;

        let parsed: CurrentResponse = serde_json::from_str(body).expect("valid payload");
        assert_eq!(parsed.timezone, 23_400);
        assert_eq!(parsed.weather[0].id, 500);
        assert_eq!(parsed.main.humidity, 74);
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(250);
        assert_eq!(truncate_body(&long).len(), 203);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let burmese = "မ".repeat(300);
        let truncated = truncate_body(&burmese);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    #[test]
    fn with_options_trims_trailing_slash() {
        let provider =
            OpenWeatherProvider::with_options("KEY".into(), "http://localhost:1234/", Duration::from_secs(1))
                .expect("client builds");
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
