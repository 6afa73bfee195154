//! Live weather resolution: sticky key check, cache, provider, normalization.
//!
//! Every failure ends in `None`; callers substitute mock data.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{fmt, sync::Arc};
use tracing::{debug, error, info, warn};

use crate::{
    cache::WeatherCache,
    condition::Condition,
    key_state::ApiKeyState,
    model::{
        HourlyPoint, TARGET_HOURS, TimeOfDay, WeatherSnapshot, format_last_updated, hour_label,
        label_sort_key, wind_kmh,
    },
    provider::{
        CurrentResponse, ForecastResponse, ProviderError, WeatherProvider,
        openweather::ForecastEntry,
    },
};

/// City used to probe whether the key is accepted.
const PROBE_CITY: &str = "London";

/// Largest temperature shift applied to gap-filled forecast slots.
const GAP_FILL_JITTER: i32 = 2;

pub struct Resolver {
    provider: Option<Arc<dyn WeatherProvider>>,
    cache: WeatherCache,
    key_state: Arc<ApiKeyState>,
    rng: Mutex<StdRng>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("provider", &self.provider)
            .field("cache", &self.cache)
            .field("key_valid", &self.key_state.is_valid())
            .finish()
    }
}

impl Resolver {
    /// `provider` is `None` when no credential is configured.
    pub fn new(
        provider: Option<Arc<dyn WeatherProvider>>,
        cache: WeatherCache,
        key_state: Arc<ApiKeyState>,
    ) -> Self {
        Self {
            provider,
            cache,
            key_state,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fix the random source used for gap-filling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn key_state(&self) -> &Arc<ApiKeyState> {
        &self.key_state
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub async fn resolve(&self, city: &str, force_refresh: bool) -> Option<WeatherSnapshot> {
        if !self.key_state.is_valid() {
            debug!(city, "Skipping API call - API key previously detected as invalid");
            return None;
        }

        if !force_refresh {
            if let Some(cached) = self.cache.weather(city).await {
                return Some(cached);
            }
        }

        let provider = self.live_provider()?;

        let current = match provider.current(city).await {
            Ok(current) => current,
            Err(err) => {
                self.record_failure(city, &err);
                return None;
            }
        };

        let Some(mut snapshot) = snapshot_from_current(city, &current, Utc::now()) else {
            warn!(city, "Weather response contained no condition entry");
            return None;
        };

        snapshot.hourly_forecast = self.forecast(city, force_refresh).await;

        self.cache.store_weather(city, &snapshot).await;
        info!(city, condition = %snapshot.condition, temperature = snapshot.temperature, "Resolved live weather");
        Some(snapshot)
    }

    pub async fn forecast(&self, city: &str, force_refresh: bool) -> Option<Vec<HourlyPoint>> {
        if !self.key_state.is_valid() {
            debug!(city, "Skipping forecast call - API key previously detected as invalid");
            return None;
        }

        if !force_refresh {
            if let Some(cached) = self.cache.forecast(city).await {
                return Some(cached);
            }
        }

        let provider = self.live_provider()?;

        let response = match provider.forecast(city).await {
            Ok(response) => response,
            Err(err) => {
                self.record_failure(city, &err);
                return None;
            }
        };

        let points = {
            let mut rng = self.rng.lock();
            build_hourly(&response, Utc::now(), &mut *rng)
        };

        let Some(points) = points else {
            warn!(city, "Forecast response contained no usable entries");
            return None;
        };

        self.cache.store_forecast(city, &points).await;
        Some(points)
    }

    pub async fn clear_cache(&self, city: &str) {
        self.cache.clear_city(city).await;
    }

    /// Probe the provider once; a rejected key is remembered.
    pub async fn is_key_valid(&self) -> bool {
        if !self.key_state.is_valid() {
            return false;
        }
        let Some(provider) = &self.provider else {
            return false;
        };

        match provider.check_key(PROBE_CITY).await {
            Ok(()) => true,
            Err(err) => {
                self.record_failure(PROBE_CITY, &err);
                false
            }
        }
    }

    fn live_provider(&self) -> Option<&Arc<dyn WeatherProvider>> {
        if self.provider.is_none() {
            debug!("No OpenWeather API key found, using mock data");
        }
        self.provider.as_ref()
    }

    fn record_failure(&self, city: &str, err: &ProviderError) {
        if err.is_unauthorized() {
            error!(city, "Invalid OpenWeather API key detected");
            self.key_state.mark_invalid();
        } else {
            warn!(city, error = %err, "Error fetching weather data");
        }
    }
}

fn fixed_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

/// Normalize a current-weather body. `None` when it carries no condition.
pub(crate) fn snapshot_from_current(
    city: &str,
    current: &CurrentResponse,
    now: DateTime<Utc>,
) -> Option<WeatherSnapshot> {
    let weather = current.weather.first()?;
    let offset = fixed_offset(current.timezone);
    let observed = DateTime::from_timestamp(current.dt, 0).unwrap_or(now).with_timezone(&offset);
    let local_now = now.with_timezone(&offset);

    Some(WeatherSnapshot {
        city: city.to_string(),
        temperature: current.main.temp.round() as i32,
        condition: Condition::from_code(weather.id),
        humidity: current.main.humidity.min(100),
        wind_speed: wind_kmh(current.wind.speed),
        time: TimeOfDay::from_hour(local_now.hour()),
        description: weather.description.clone(),
        is_real_data: true,
        last_updated: format_last_updated(&observed),
        icon: Some(weather.icon.clone()).filter(|icon| !icon.is_empty()),
        weather_code: Some(weather.id),
        hourly_forecast: None,
    })
}

fn point_from_entry(hour: u32, entry: &ForecastEntry) -> Option<HourlyPoint> {
    let weather = entry.weather.first()?;
    Some(HourlyPoint {
        time: hour_label(hour),
        temperature: entry.main.temp.round() as i32,
        icon: weather.icon.clone(),
        condition: Condition::from_code(weather.id),
        weather_code: Some(weather.id),
    })
}

/// Two-digit prefix of an icon code such as `10d`, or the condition's own icon.
fn icon_prefix(icon: &str, condition: Condition) -> String {
    icon.get(..2)
        .filter(|prefix| prefix.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .unwrap_or_else(|| condition.icon_code(true)[..2].to_string())
}

/// Today's strip in city-local time, gap-filled to all target hours.
///
/// Missing slots copy the first real slot of today (or the first provider
/// entry when none matched) with a jittered temperature.
pub(crate) fn build_hourly<R: Rng>(
    response: &ForecastResponse,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Vec<HourlyPoint>> {
    let offset = fixed_offset(response.city.timezone);
    let today = now.with_timezone(&offset).date_naive();

    let mut points: Vec<HourlyPoint> = Vec::with_capacity(TARGET_HOURS.len());
    for entry in &response.list {
        let Some(local) = DateTime::from_timestamp(entry.dt, 0).map(|t| t.with_timezone(&offset)) else {
            continue;
        };
        let hour = local.hour();
        if local.date_naive() != today || !TARGET_HOURS.contains(&hour) {
            continue;
        }
        let label = hour_label(hour);
        if points.iter().any(|p| p.time == label) {
            continue;
        }
        if let Some(point) = point_from_entry(hour, entry) {
            points.push(point);
        }
    }

    if points.len() < TARGET_HOURS.len() {
        let baseline = match points.first() {
            Some(first) => first.clone(),
            None => response.list.iter().find_map(|entry| point_from_entry(0, entry))?,
        };
        let prefix = icon_prefix(&baseline.icon, baseline.condition);

        for hour in TARGET_HOURS {
            let label = hour_label(hour);
            if points.iter().any(|p| p.time == label) {
                continue;
            }
            let jitter = rng.gen_range(-GAP_FILL_JITTER..=GAP_FILL_JITTER);
            points.push(HourlyPoint {
                time: label,
                temperature: baseline.temperature + jitter,
                icon: format!("{prefix}{}", if hour >= 18 { 'n' } else { 'd' }),
                condition: baseline.condition,
                weather_code: baseline.weather_code,
            });
        }
    }

    points.sort_by_key(|p| label_sort_key(&p.time));
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{ForecastCity, OwMain, OwWeather, OwWind};
    use chrono::TimeZone;

    const BANGKOK_OFFSET: i32 = 7 * 3600;

    fn now_bangkok(hour: u32) -> DateTime<Utc> {
        fixed_offset(BANGKOK_OFFSET)
            .with_ymd_and_hms(2026, 10, 14, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry_at(day: u32, hour: u32, temp: f64, id: u16, icon: &str) -> ForecastEntry {
        let dt = fixed_offset(BANGKOK_OFFSET)
            .with_ymd_and_hms(2026, 10, day, hour, 0, 0)
            .unwrap()
            .timestamp();
        ForecastEntry {
            dt,
            main: OwMain { temp, humidity: 70 },
            weather: vec![OwWeather { id, description: String::new(), icon: icon.into() }],
            wind: OwWind { speed: 2.0 },
        }
    }

    fn forecast(list: Vec<ForecastEntry>) -> ForecastResponse {
        ForecastResponse {
            city: ForecastCity { name: "Bangkok".into(), timezone: BANGKOK_OFFSET },
            list,
        }
    }

    fn labels(points: &[HourlyPoint]) -> Vec<&str> {
        points.iter().map(|p| p.time.as_str()).collect()
    }

    #[test]
    fn keeps_only_todays_target_hours() {
        let response = forecast(vec![
            entry_at(14, 10, 30.2, 800, "01d"),
            entry_at(14, 11, 31.0, 800, "01d"),
            entry_at(14, 12, 32.4, 801, "02d"),
            entry_at(14, 14, 33.0, 500, "10d"),
            entry_at(14, 16, 31.6, 500, "10d"),
            entry_at(14, 18, 29.0, 803, "04n"),
            entry_at(15, 10, 20.0, 600, "13d"),
        ]);

        let mut rng = StdRng::seed_from_u64(1);
        let points = build_hourly(&response, now_bangkok(8), &mut rng).unwrap();

        assert_eq!(labels(&points), ["10am", "12pm", "2pm", "4pm", "6pm"]);
        assert_eq!(points[1].temperature, 32);
        assert_eq!(points[2].condition, Condition::Rain);
        assert_eq!(points[4].icon, "04n");
    }

    #[test]
    fn gap_fill_merges_and_sorts() {
        let response = forecast(vec![
            entry_at(14, 12, 30.0, 500, "10d"),
            entry_at(14, 14, 31.0, 800, "01d"),
        ]);

        let mut rng = StdRng::seed_from_u64(3);
        let points = build_hourly(&response, now_bangkok(11), &mut rng).unwrap();

        assert_eq!(labels(&points), ["10am", "12pm", "2pm", "4pm", "6pm"]);

        for synthesized in [&points[0], &points[3], &points[4]] {
            assert_eq!(synthesized.condition, Condition::Rain);
            assert_eq!(synthesized.weather_code, Some(500));
            assert!((28..=32).contains(&synthesized.temperature));
        }
        assert_eq!(points[0].icon, "10d");
        assert_eq!(points[3].icon, "10d");
        assert_eq!(points[4].icon, "10n");
        assert_eq!(points[2].condition, Condition::Clear);
    }

    #[test]
    fn late_in_the_day_uses_first_provider_entry() {
        let response = forecast(vec![
            entry_at(15, 1, 24.0, 741, "50n"),
            entry_at(15, 4, 23.0, 800, "01n"),
        ]);

        let mut rng = StdRng::seed_from_u64(8);
        let points = build_hourly(&response, now_bangkok(22), &mut rng).unwrap();

        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.condition == Condition::Fog));
        assert!(points.iter().all(|p| (22..=26).contains(&p.temperature)));
        assert_eq!(points[4].icon, "50n");
    }

    #[test]
    fn empty_list_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(build_hourly(&forecast(vec![]), now_bangkok(9), &mut rng).is_none());
    }

    #[test]
    fn gap_fill_is_reproducible_with_seed() {
        let response = forecast(vec![entry_at(14, 16, 27.0, 802, "03d")]);
        let a = build_hourly(&response, now_bangkok(9), &mut StdRng::seed_from_u64(11));
        let b = build_hourly(&response, now_bangkok(9), &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn snapshot_normalizes_units_and_time() {
        let current = CurrentResponse {
            name: "Krung Thep".into(),
            dt: now_bangkok(9).timestamp(),
            timezone: BANGKOK_OFFSET,
            main: OwMain { temp: 30.5, humidity: 66 },
            weather: vec![OwWeather { id: 500, description: "light rain".into(), icon: "10d".into() }],
            wind: OwWind { speed: 5.0 },
        };

        let snapshot = snapshot_from_current("Bangkok", &current, now_bangkok(13)).unwrap();
        assert_eq!(snapshot.city, "Bangkok");
        assert_eq!(snapshot.temperature, 31);
        assert_eq!(snapshot.wind_speed, 18);
        assert_eq!(snapshot.condition, Condition::Rain);
        assert_eq!(snapshot.time, TimeOfDay::Night);
        assert_eq!(snapshot.last_updated, "Oct 14, 09:00 AM");
        assert!(snapshot.is_real_data);
    }

    #[test]
    fn snapshot_requires_a_condition() {
        let current = CurrentResponse {
            name: "Yangon".into(),
            dt: 0,
            timezone: 0,
            main: OwMain { temp: 25.0, humidity: 80 },
            weather: vec![],
            wind: OwWind::default(),
        };
        assert!(snapshot_from_current("Yangon", &current, Utc::now()).is_none());
    }

    #[test]
    fn icon_prefix_falls_back_to_condition() {
        assert_eq!(icon_prefix("09d", Condition::Drizzle), "09");
        assert_eq!(icon_prefix("", Condition::Snow), "13");
    }
}
