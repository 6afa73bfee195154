use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::condition::Condition;

/// Part of the day a post is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Night,
}

impl TimeOfDay {
    /// `Morning` before noon, `Night` afterwards.
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 { TimeOfDay::Morning } else { TimeOfDay::Night }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Night => "night",
        }
    }
}

/// Normalized weather for one city, whichever source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: i32,
    pub condition: Condition,
    pub humidity: u8,
    /// km/h
    pub wind_speed: u32,
    pub time: TimeOfDay,
    pub description: String,
    pub is_real_data: bool,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_forecast: Option<Vec<HourlyPoint>>,
}

/// One slot of the daytime forecast strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    /// Label such as `10am` or `2pm`.
    pub time: String,
    pub temperature: i32,
    pub icon: String,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<u16>,
}

/// Hours of the day covered by the forecast strip.
pub const TARGET_HOURS: [u32; 5] = [10, 12, 14, 16, 18];

/// Format a 24h hour as the strip label (`10am`, `12pm`, `2pm`).
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12am".to_string(),
        1..=11 => format!("{hour}am"),
        12 => "12pm".to_string(),
        _ => format!("{}pm", hour - 12),
    }
}

/// Sort key of a strip label: `12pm` is 12, `Npm` is N+12, `Nam` is N.
///
/// Labels that do not parse sort last.
pub fn label_sort_key(label: &str) -> u32 {
    let (digits, is_pm) = if let Some(d) = label.strip_suffix("pm") {
        (d, true)
    } else if let Some(d) = label.strip_suffix("am") {
        (d, false)
    } else {
        return u32::MAX;
    };

    let Ok(hour) = digits.trim().parse::<u32>() else {
        return u32::MAX;
    };

    match (is_pm, hour) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, h) => h,
    }
}

/// `Oct 14, 09:30 AM` in the timestamp's own offset.
pub fn format_last_updated<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format("%b %-d, %I:%M %p").to_string()
}

/// Convert m/s to whole km/h.
pub fn wind_kmh(speed_mps: f64) -> u32 {
    (speed_mps * 3.6).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_speed_converts_to_kmh() {
        assert_eq!(wind_kmh(5.0), 18);
        assert_eq!(wind_kmh(0.0), 0);
        assert_eq!(wind_kmh(1.4), 5);
    }

    #[test]
    fn time_of_day_splits_at_noon() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn last_updated_uses_short_month_and_twelve_hour_clock() {
        let at = chrono::FixedOffset::east_opt(6 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 4, 21, 5, 0)
            .unwrap();
        assert_eq!(format_last_updated(&at), "Oct 4, 09:05 PM");
    }

    #[test]
    fn labels_for_target_hours() {
        let labels: Vec<String> = TARGET_HOURS.iter().map(|h| hour_label(*h)).collect();
        assert_eq!(labels, ["10am", "12pm", "2pm", "4pm", "6pm"]);
    }

    #[test]
    fn label_sort_key_orders_twelve_pm_before_afternoon() {
        assert_eq!(label_sort_key("10am"), 10);
        assert_eq!(label_sort_key("12pm"), 12);
        assert_eq!(label_sort_key("2pm"), 14);
        assert_eq!(label_sort_key("6pm"), 18);
        assert_eq!(label_sort_key("noon"), u32::MAX);
    }

    #[test]
    fn snapshot_serializes_with_camel_case_fields() {
        let snapshot = WeatherSnapshot {
            city: "Yangon".into(),
            temperature: 31,
            condition: Condition::Rain,
            humidity: 70,
            wind_speed: 18,
            time: TimeOfDay::Night,
            description: "light rain".into(),
            is_real_data: true,
            last_updated: "Oct 14, 09:30 AM".into(),
            icon: Some("10n".into()),
            weather_code: Some(500),
            hourly_forecast: None,
        };

        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["isRealData"], true);
        assert_eq!(json["windSpeed"], 18);
        assert_eq!(json["time"], "night");
        assert_eq!(json["condition"], "Rain");
        assert!(json.get("hourlyForecast").is_none());
    }
}
