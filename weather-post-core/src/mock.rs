use chrono::{DateTime, Local, TimeZone, Timelike};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::fmt;

use crate::{
    condition::{Condition, condition_text},
    model::{HourlyPoint, TARGET_HOURS, TimeOfDay, WeatherSnapshot, format_last_updated, hour_label},
};

/// Conditions the generator draws from.
pub const MOCK_CONDITIONS: [Condition; 6] = [
    Condition::Clear,
    Condition::Clouds,
    Condition::Rain,
    Condition::Drizzle,
    Condition::Thunderstorm,
    Condition::Mist,
];

/// Rise-then-fall offsets applied to the base temperature across the strip.
const HOURLY_OFFSETS: [i32; 5] = [1, 2, 3, 2, 1];

/// Index of the strip slot from which night icons are used (6pm).
const NIGHT_SLOT: usize = 4;

/// Produces plausible fallback weather when live data is unavailable.
pub struct MockGenerator {
    rng: Mutex<StdRng>,
}

impl fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockGenerator").finish_non_exhaustive()
    }
}

impl MockGenerator {
    pub fn from_entropy() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    pub fn generate(&self, city: &str) -> WeatherSnapshot {
        self.generate_at(city, &Local::now())
    }

    /// Same as [`generate`](Self::generate) with an explicit clock reading.
    pub fn generate_at<Tz>(&self, city: &str, now: &DateTime<Tz>) -> WeatherSnapshot
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut rng = self.rng.lock();

        let condition = *MOCK_CONDITIONS.choose(&mut *rng).unwrap_or(&Condition::Clear);
        let temperature: i32 = rng.gen_range(20..35);
        let humidity: u8 = rng.gen_range(50..80);
        let wind_speed: u32 = rng.gen_range(5..25);
        let code = condition.representative_code();

        let hourly_forecast = TARGET_HOURS
            .iter()
            .zip(HOURLY_OFFSETS)
            .enumerate()
            .map(|(idx, (hour, offset))| HourlyPoint {
                time: hour_label(*hour),
                temperature: temperature + offset,
                icon: condition.icon_code(idx < NIGHT_SLOT),
                condition,
                weather_code: Some(code),
            })
            .collect();

        let hour = now.hour();

        WeatherSnapshot {
            city: city.to_string(),
            temperature,
            condition,
            humidity,
            wind_speed,
            time: TimeOfDay::from_hour(hour),
            description: condition_text(condition, Some(code)).to_lowercase(),
            is_real_data: false,
            last_updated: format_last_updated(now),
            icon: Some(condition.icon_code((6..18).contains(&hour))),
            weather_code: Some(code),
            hourly_forecast: Some(hourly_forecast),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
