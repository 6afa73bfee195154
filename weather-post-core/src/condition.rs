use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather condition category used throughout the post pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Dust,
    Smoke,
}

impl Condition {
    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Drizzle,
            Condition::Thunderstorm,
            Condition::Snow,
            Condition::Mist,
            Condition::Fog,
            Condition::Haze,
            Condition::Dust,
            Condition::Smoke,
        ]
    }

    /// Map an OpenWeather condition id to a category.
    ///
    /// See <https://openweathermap.org/weather-conditions>. Unknown ids map to `Clear`.
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => Condition::Thunderstorm,
            300..=399 => Condition::Drizzle,
            500..=599 => Condition::Rain,
            600..=699 => Condition::Snow,
            701 => Condition::Mist,
            711 => Condition::Smoke,
            721 => Condition::Haze,
            731 | 761 => Condition::Dust,
            741 => Condition::Fog,
            800 => Condition::Clear,
            801..=u16::MAX => Condition::Clouds,
            _ => Condition::Clear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Drizzle => "Drizzle",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snow => "Snow",
            Condition::Mist => "Mist",
            Condition::Fog => "Fog",
            Condition::Haze => "Haze",
            Condition::Dust => "Dust",
            Condition::Smoke => "Smoke",
        }
    }

    /// A representative OpenWeather id for the category.
    pub fn representative_code(&self) -> u16 {
        match self {
            Condition::Clear => 800,
            Condition::Clouds => 802,
            Condition::Rain => 500,
            Condition::Drizzle => 300,
            Condition::Thunderstorm => 200,
            Condition::Snow => 600,
            Condition::Mist => 701,
            Condition::Fog => 741,
            Condition::Haze => 721,
            Condition::Dust => 761,
            Condition::Smoke => 711,
        }
    }

    /// OpenWeather icon code for the category, e.g. `10d` / `10n`.
    pub fn icon_code(&self, is_day: bool) -> String {
        let prefix = match self {
            Condition::Clear => "01",
            Condition::Clouds => "03",
            Condition::Rain => "10",
            Condition::Drizzle => "09",
            Condition::Thunderstorm => "11",
            Condition::Snow => "13",
            Condition::Mist
            | Condition::Fog
            | Condition::Haze
            | Condition::Dust
            | Condition::Smoke => "50",
        };
        format!("{prefix}{}", if is_day { 'd' } else { 'n' })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label for a condition, refined by the provider id when known.
pub fn condition_text(condition: Condition, code: Option<u16>) -> String {
    let Some(code) = code else {
        return condition.as_str().to_string();
    };

    let label = match code {
        800 => "Clear Sky",
        801 => "Few Clouds",
        802 => "Scattered Clouds",
        803 => "Broken Clouds",
        804 => "Overcast Clouds",
        210..=221 => "Thunderstorm",
        200..=299 => "Thunderstorm with Rain",
        300..=399 => "Drizzle",
        500 => "Light Rain",
        501 => "Moderate Rain",
        502..=504 => "Heavy Rain",
        511 => "Freezing Rain",
        520..=599 => "Shower Rain",
        505..=599 => "Rain",
        600 => "Light Snow",
        601 => "Snow",
        602 => "Heavy Snow",
        611..=616 => "Sleet",
        620..=699 => "Shower Snow",
        603..=699 => "Snow",
        701 => "Mist",
        711 => "Smoke",
        721 => "Haze",
        731 | 761 => "Dust",
        741 => "Fog",
        751 => "Sand",
        762 => "Volcanic Ash",
        771 => "Squalls",
        781 => "Tornado",
        _ => condition.as_str(),
    };
    label.to_string()
}

/// Asset path of the modern icon set for an OpenWeather icon code.
pub fn icon_asset(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "/images/modern-icons/clear-day.svg",
        "02d" => "/images/modern-icons/partly-cloudy-day.svg",
        "03d" | "04d" | "03n" | "04n" => "/images/modern-icons/cloudy.svg",
        "09d" | "09n" => "/images/modern-icons/rain.svg",
        "10d" => "/images/modern-icons/rain-day.svg",
        "11d" | "11n" => "/images/modern-icons/thunderstorm.svg",
        "13d" | "13n" => "/images/modern-icons/snow.svg",
        "50d" | "50n" => "/images/modern-icons/fog.svg",
        "01n" => "/images/modern-icons/clear-night.svg",
        "02n" => "/images/modern-icons/partly-cloudy-night.svg",
        "10n" => "/images/modern-icons/rain-night.svg",
        _ => "/images/modern-icons/clear-day.svg",
    }
}
