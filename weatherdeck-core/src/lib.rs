//! Core library for the `weatherdeck` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider access layer (query dispatch + error normalization)
//! - The current-weather report projection
//! - Degraded-mode fallback data and the plan-gate policy
//! - The persisted favorites list
//!
//! It is used by `weatherdeck-cli`, but can also be reused by other binaries
//! or services.

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod favorites;
pub mod format;
pub mod model;
pub mod track;

pub use client::{DEFAULT_BASE_URL, DEFAULT_FORECAST_DAYS, WeatherClient, WeatherSource};
pub use config::{ACCESS_KEY_ENV, Config};
pub use error::WeatherError;
pub use fallback::{FallbackGenerator, PlanGatePolicy};
pub use favorites::{Favorites, FavoritesStore, FileFavoritesStore, MemoryFavoritesStore};
pub use format::format_report;
pub use model::{
    CurrentPayload, LocationCandidate, SavedLocation, WeatherReport,
};
pub use track::Generations;
