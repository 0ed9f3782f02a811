//! Locally synthesized placeholder data for plan-gated capabilities.
//!
//! The free provider tier rejects forecast, historical, marine, and
//! autocomplete calls. Consuming views never show a dead end: on any query
//! failure they render data from [`FallbackGenerator`] alongside a notice,
//! and [`PlanGatePolicy`] decides whether the notice can name tier gating
//! as the definite cause.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::{error::WeatherError, model::LocationCandidate};

/// One day of the placeholder forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: String,
    pub high: i32,
    pub low: i32,
    pub condition: String,
    pub icon: String,
    /// Precipitation chance, percent.
    pub precip: u8,
}

/// One hour of the placeholder historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub temp: i32,
    pub humidity: i32,
    pub wind_speed: i32,
}

/// Placeholder daily summary plus hourly breakdown for one past date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    pub date: NaiveDate,
    pub avg_temp: i32,
    pub max_temp: i32,
    pub min_temp: i32,
    pub humidity: i32,
    pub precipitation: f64,
    pub wind_speed: i32,
    pub condition: String,
    pub hourly: Vec<HourlyPoint>,
}

/// Placeholder marine conditions block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineConditions {
    pub location: String,
    pub water_temp: i32,
    pub wave_height: f64,
    pub wave_period: u8,
    pub wave_direction: String,
    pub swell_height: f64,
    pub swell_period: u8,
    pub swell_direction: String,
    pub wind_speed: u8,
    pub wind_direction: String,
    pub wind_gust: u8,
    pub visibility: u8,
    pub uv_index: u8,
    pub tide_status: String,
    pub next_high_tide: String,
    pub next_low_tide: String,
}

/// Produces the placeholder data each view renders in degraded mode.
///
/// Separate from rendering so it can be swapped and tested on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Hand-authored week of conditions, truncated to `days` entries.
    pub fn forecast(&self, days: u8) -> Vec<DailyForecast> {
        let week = [
            ("Today", 24, 18, "Partly Cloudy", "cloud-sun", 10),
            ("Tomorrow", 26, 19, "Sunny", "sun", 0),
            ("Wednesday", 23, 17, "Cloudy", "cloud", 20),
            ("Thursday", 21, 16, "Light Rain", "cloud-rain", 60),
            ("Friday", 22, 15, "Partly Cloudy", "cloud-sun", 15),
            ("Saturday", 25, 18, "Sunny", "sun", 5),
            ("Sunday", 27, 20, "Sunny", "sun", 0),
        ];

        week.iter()
            .take(usize::from(days))
            .map(|&(day, high, low, condition, icon, precip)| DailyForecast {
                day: day.to_string(),
                high,
                low,
                condition: condition.to_string(),
                icon: icon.to_string(),
                precip,
            })
            .collect()
    }

    /// Daily summary with a 24-point hourly series.
    ///
    /// Temperature and humidity follow fixed sinusoids of the hour index and
    /// are fully deterministic; wind speed is deliberately randomized within
    /// 10..=20 so the table does not look copy-pasted between hours.
    pub fn historical(&self, date: NaiveDate) -> HistoricalSummary {
        let hourly = (0u8..24)
            .map(|hour| {
                let h = f64::from(hour);
                HourlyPoint {
                    hour,
                    temp: (18.0 + 8.0 * ((h - 6.0) * PI / 12.0).sin()).round() as i32,
                    humidity: (60.0 + 20.0 * ((h - 12.0) * PI / 12.0).cos()).round() as i32,
                    wind_speed: (10.0 + 10.0 * rand::random::<f64>()).round() as i32,
                }
            })
            .collect();

        HistoricalSummary {
            date,
            avg_temp: 22,
            max_temp: 26,
            min_temp: 18,
            humidity: 65,
            precipitation: 2.5,
            wind_speed: 15,
            condition: "Partly Cloudy".to_string(),
            hourly,
        }
    }

    /// Fixed coastal-conditions block for the given location.
    pub fn marine(&self, location: &str) -> MarineConditions {
        MarineConditions {
            location: location.to_string(),
            water_temp: 18,
            wave_height: 1.5,
            wave_period: 8,
            wave_direction: "SW".to_string(),
            swell_height: 1.2,
            swell_period: 12,
            swell_direction: "W".to_string(),
            wind_speed: 22,
            wind_direction: "WSW".to_string(),
            wind_gust: 28,
            visibility: 15,
            uv_index: 6,
            tide_status: "Rising".to_string(),
            next_high_tide: "14:32".to_string(),
            next_low_tide: "20:45".to_string(),
        }
    }

    /// Echo the search text back as a single basic candidate.
    pub fn location_search(&self, query: &str) -> Vec<LocationCandidate> {
        vec![LocationCandidate {
            name: query.to_string(),
            country: "Searched Location".to_string(),
            region: String::new(),
            lat: 0.0,
            lon: 0.0,
        }]
    }
}

/// Classifies provider failures as plan gating.
///
/// The provider's error vocabulary is an external, versioned contract, so the
/// markers live here as data instead of being scattered through the views.
#[derive(Debug, Clone)]
pub struct PlanGatePolicy {
    markers: Vec<String>,
    codes: Vec<i64>,
}

impl Default for PlanGatePolicy {
    fn default() -> Self {
        Self {
            markers: vec!["requires".to_string(), "Business".to_string()],
            codes: vec![101],
        }
    }
}

impl PlanGatePolicy {
    pub fn new(markers: Vec<String>, codes: Vec<i64>) -> Self {
        Self { markers, codes }
    }

    /// True when the failure definitely means the capability is tier-gated.
    /// Views degrade on any failure either way; this only refines the notice.
    pub fn is_plan_gated(&self, err: &WeatherError) -> bool {
        if err.code().is_some_and(|code| self.codes.contains(&code)) {
            return true;
        }
        let message = err.message();
        self.markers.iter().any(|marker| message.contains(marker.as_str()))
    }
}
