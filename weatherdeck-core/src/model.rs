use serde::{Deserialize, Serialize};

/// Raw `location` block of a `/current` response. Field names follow the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone_id: Option<String>,
    pub localtime: Option<String>,
}

/// Raw `current` block of a `/current` response. Every numeric field is
/// optional: the provider omits fields freely depending on plan and region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure: Option<f64>,
    pub precip: Option<f64>,
    pub cloudcover: Option<f64>,
    pub visibility: Option<f64>,
    pub uv_index: Option<f64>,
    #[serde(default)]
    pub weather_descriptions: Vec<String>,
    #[serde(default)]
    pub weather_icons: Vec<String>,
    /// `"yes"` or `"no"` on the wire.
    pub is_day: Option<String>,
}

/// A successful `/current` response, typed only as far as the access layer
/// needs. Both blocks stay optional so a sparse payload deserializes cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentPayload {
    pub location: Option<LocationInfo>,
    pub current: Option<CurrentConditions>,
}

/// Flattened, render-ready projection of a `/current` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: ReportLocation,
    pub current: ReportConditions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportLocation {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: Option<String>,
    pub localtime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConditions {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure: Option<f64>,
    pub precipitation: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub visibility: Option<f64>,
    pub uv_index: Option<f64>,
    pub description: String,
    pub icon: Option<String>,
    pub is_day: bool,
}

/// Provider error envelope. May arrive with any HTTP status, 200 included.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: Option<i64>,
    pub info: Option<String>,
}

/// One candidate from `/autocomplete` (or from the search fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

/// Autocomplete success body, as far as this layer cares about it.
#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteResults {
    #[serde(default)]
    pub results: Vec<LocationCandidate>,
}

/// A favorited location, persisted by the favorites store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}
