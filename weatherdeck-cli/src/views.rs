//! The five dashboard views.
//!
//! Each `load_*` function fetches through the access layer and reduces the
//! outcome to a renderable view model; the `render_*` functions only print.
//! Plan-gated views (forecast, historical, marine, search) never dead-end:
//! any failure degrades to generator data plus a notice.
//!
//! Fetches are guarded by a request generation so a view that refires while
//! a call is still in flight shows the most recently requested data, not the
//! most recently completed response. `load_*` returns `None` when a newer
//! request superseded the one awaited.

use std::future::Future;

use serde_json::Value;
use tracing::warn;
use weatherdeck_core::{
    FallbackGenerator, Generations, LocationCandidate, PlanGatePolicy, WeatherError,
    WeatherReport, WeatherSource,
    fallback::{DailyForecast, HistoricalSummary, MarineConditions},
    format::format_report,
    model::AutocompleteResults,
};

/// Degraded-mode banner shown above generator data.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// True when the failure definitely means tier gating.
    pub plan_gated: bool,
    pub message: String,
}

fn degrade_notice(policy: &PlanGatePolicy, err: &WeatherError, what: &str) -> Notice {
    let plan_gated = policy.is_plan_gated(err);
    let message = if plan_gated {
        format!("{what} requires a paid provider plan. Showing demo data below.")
    } else {
        format!("{err}. Showing demo data below.")
    };
    Notice { plan_gated, message }
}

/// Await one fetch under a fresh generation token; `None` when a newer
/// request started before this one resolved.
async fn latest_only<T>(generations: &Generations, fut: impl Future<Output = T>) -> Option<T> {
    let token = generations.begin();
    let out = fut.await;
    generations.is_current(token).then_some(out)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurrentView {
    Report(Box<WeatherReport>),
    /// 2xx payload without a `current` block.
    NoData,
    /// Blocking error state; retry is re-running the command.
    Failed(String),
}

pub async fn load_current(
    generations: &Generations,
    source: &dyn WeatherSource,
    query: &str,
) -> Option<CurrentView> {
    let outcome = latest_only(generations, source.current(query)).await?;

    Some(match outcome {
        Ok(payload) => match format_report(&payload) {
            Some(report) => CurrentView::Report(Box::new(report)),
            None => CurrentView::NoData,
        },
        Err(err) => {
            warn!(%err, query, "current weather query failed");
            CurrentView::Failed(err.to_string())
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastView {
    Live(Value),
    Degraded { notice: Notice, days: Vec<DailyForecast> },
}

pub async fn load_forecast(
    generations: &Generations,
    source: &dyn WeatherSource,
    generator: &FallbackGenerator,
    policy: &PlanGatePolicy,
    query: &str,
    days: u8,
) -> Option<ForecastView> {
    let outcome = latest_only(generations, source.forecast(query, days)).await?;

    Some(match outcome {
        Ok(payload) => ForecastView::Live(payload),
        Err(err) => {
            warn!(%err, query, "forecast query failed, degrading");
            ForecastView::Degraded {
                notice: degrade_notice(policy, &err, "Forecast data"),
                days: generator.forecast(days),
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoricalView {
    Live(Value),
    Degraded { notice: Notice, summary: HistoricalSummary },
}

pub async fn load_historical(
    generations: &Generations,
    source: &dyn WeatherSource,
    generator: &FallbackGenerator,
    policy: &PlanGatePolicy,
    query: &str,
    date: chrono::NaiveDate,
) -> Option<HistoricalView> {
    let outcome = latest_only(generations, source.historical(query, date)).await?;

    Some(match outcome {
        Ok(payload) => HistoricalView::Live(payload),
        Err(err) => {
            warn!(%err, query, %date, "historical query failed, degrading");
            HistoricalView::Degraded {
                notice: degrade_notice(policy, &err, "Historical data"),
                summary: generator.historical(date),
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarineView {
    Live(Value),
    Degraded { notice: Notice, conditions: MarineConditions },
}

pub async fn load_marine(
    generations: &Generations,
    source: &dyn WeatherSource,
    generator: &FallbackGenerator,
    policy: &PlanGatePolicy,
    query: &str,
) -> Option<MarineView> {
    let outcome = latest_only(generations, source.marine(query)).await?;

    Some(match outcome {
        Ok(payload) => MarineView::Live(payload),
        Err(err) => {
            warn!(%err, query, "marine query failed, degrading");
            MarineView::Degraded {
                notice: degrade_notice(policy, &err, "Marine data"),
                conditions: generator.marine(query),
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub candidates: Vec<LocationCandidate>,
    pub notice: Option<Notice>,
}

pub async fn load_search(
    generations: &Generations,
    source: &dyn WeatherSource,
    generator: &FallbackGenerator,
    policy: &PlanGatePolicy,
    query: &str,
) -> Option<SearchView> {
    let outcome = latest_only(generations, source.lookup_location(query)).await?;

    Some(match outcome {
        Ok(payload) => {
            let parsed: AutocompleteResults =
                serde_json::from_value(payload).unwrap_or(AutocompleteResults { results: vec![] });
            if parsed.results.is_empty() {
                // Success body without candidates: still show something.
                SearchView { candidates: generator.location_search(query), notice: None }
            } else {
                SearchView { candidates: parsed.results, notice: None }
            }
        }
        Err(err) => {
            warn!(%err, query, "location lookup failed, degrading");
            let plan_gated = policy.is_plan_gated(&err);
            let message = if plan_gated {
                "Autocomplete requires a paid provider plan. Showing basic search.".to_string()
            } else {
                format!("{err}. Showing basic search.")
            };
            SearchView {
                candidates: generator.location_search(query),
                notice: Some(Notice { plan_gated, message }),
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_notice(notice: &Notice) {
    if notice.plan_gated {
        println!("  [premium feature] {}", notice.message);
    } else {
        println!("  [notice] {}", notice.message);
    }
    println!();
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}{unit}"))
}

pub fn render_current(query: &str, view: &CurrentView) {
    match view {
        CurrentView::Report(report) => {
            let loc = &report.location;
            let cur = &report.current;

            let name = loc.name.as_deref().unwrap_or(query);
            let country = loc.country.as_deref().unwrap_or("-");
            println!("Current weather - {name}, {country}");
            if let Some(localtime) = &loc.localtime {
                println!("  Local time:  {localtime}");
            }
            println!("  Conditions:  {} ({})", cur.description, if cur.is_day { "day" } else { "night" });
            println!("  Temperature: {}", fmt_opt(cur.temperature, "°C"));
            println!("  Feels like:  {}", fmt_opt(cur.feels_like, "°C"));
            println!("  Humidity:    {}", fmt_opt(cur.humidity, "%"));
            println!(
                "  Wind:        {} {}",
                fmt_opt(cur.wind_speed, " km/h"),
                cur.wind_dir.as_deref().unwrap_or("")
            );
            println!("  Pressure:    {}", fmt_opt(cur.pressure, " mb"));
            println!("  Precip:      {}", fmt_opt(cur.precipitation, " mm"));
            println!("  Cloud cover: {}", fmt_opt(cur.cloud_cover, "%"));
            println!("  Visibility:  {}", fmt_opt(cur.visibility, " km"));
            println!("  UV index:    {}", fmt_opt(cur.uv_index, ""));
        }
        CurrentView::NoData => {
            println!("No weather data available for \"{query}\".");
        }
        CurrentView::Failed(message) => {
            println!("Could not fetch current weather for \"{query}\":");
            println!("  {message}");
            println!("Run the command again to retry.");
        }
    }
}

pub fn render_forecast(query: &str, days: u8, view: &ForecastView) {
    println!("{days}-day forecast - {query}");
    match view {
        ForecastView::Live(payload) => {
            // Opaque provider payload; print it as-is.
            println!("{}", serde_json::to_string_pretty(payload).unwrap_or_default());
        }
        ForecastView::Degraded { notice, days: rows } => {
            print_notice(notice);
            println!("  {:<10} {:>5} {:>5}  {:<14} {:>7}", "Day", "High", "Low", "Conditions", "Precip");
            for day in rows {
                println!(
                    "  {:<10} {:>4}° {:>4}°  {:<14} {:>6}%",
                    day.day, day.high, day.low, day.condition, day.precip
                );
            }
        }
    }
}

pub fn render_historical(query: &str, view: &HistoricalView) {
    match view {
        HistoricalView::Live(payload) => {
            println!("Historical weather - {query}");
            println!("{}", serde_json::to_string_pretty(payload).unwrap_or_default());
        }
        HistoricalView::Degraded { notice, summary } => {
            println!("Historical weather - {query}, {}", summary.date);
            print_notice(notice);
            println!("  Avg {}°C   Max {}°C   Min {}°C", summary.avg_temp, summary.max_temp, summary.min_temp);
            println!(
                "  Humidity {}%   Precip {} mm   Wind {} km/h   {}",
                summary.humidity, summary.precipitation, summary.wind_speed, summary.condition
            );
            println!();
            println!("  {:<6} {:>6} {:>9} {:>11}", "Time", "Temp", "Humidity", "Wind");
            // Every third hour keeps the table scannable.
            for point in summary.hourly.iter().filter(|p| p.hour % 3 == 0) {
                println!(
                    "  {:02}:00  {:>4}°C {:>8}% {:>6} km/h",
                    point.hour, point.temp, point.humidity, point.wind_speed
                );
            }
        }
    }
}

pub fn render_marine(query: &str, view: &MarineView) {
    println!("Marine weather - {query}");
    match view {
        MarineView::Live(payload) => {
            println!("{}", serde_json::to_string_pretty(payload).unwrap_or_default());
        }
        MarineView::Degraded { notice, conditions } => {
            print_notice(notice);
            println!("  Water temp:  {}°C", conditions.water_temp);
            println!(
                "  Waves:       {} m, {} s, from {}",
                conditions.wave_height, conditions.wave_period, conditions.wave_direction
            );
            println!(
                "  Swell:       {} m, {} s, from {}",
                conditions.swell_height, conditions.swell_period, conditions.swell_direction
            );
            println!(
                "  Wind:        {} km/h from {}, gusts {} km/h",
                conditions.wind_speed, conditions.wind_direction, conditions.wind_gust
            );
            println!("  Visibility:  {} km", conditions.visibility);
            println!("  UV index:    {}", conditions.uv_index);
            println!(
                "  Tide:        {} (high {}, low {})",
                conditions.tide_status, conditions.next_high_tide, conditions.next_low_tide
            );
        }
    }
}

pub fn render_search(query: &str, view: &SearchView) {
    println!("Location search - \"{query}\"");
    if let Some(notice) = &view.notice {
        print_notice(notice);
    }
    for (i, candidate) in view.candidates.iter().enumerate() {
        let region = if candidate.region.is_empty() {
            String::new()
        } else {
            format!(", {}", candidate.region)
        };
        println!(
            "  {}. {}{} - {} ({:.2}, {:.2})",
            i + 1,
            candidate.name,
            region,
            candidate.country,
            candidate.lat,
            candidate.lon
        );
    }
}
