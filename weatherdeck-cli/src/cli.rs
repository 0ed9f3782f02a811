use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use weatherdeck_core::{
    Config, DEFAULT_FORECAST_DAYS, FallbackGenerator, Favorites, FileFavoritesStore, Generations,
    PlanGatePolicy, SavedLocation, WeatherClient,
};

use crate::views;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdeck", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider access key.
    Configure,

    /// Current conditions for a location.
    Current {
        /// City name, postal code, or "lat,lon".
        query: String,
    },

    /// Daily forecast. Plan-gated upstream; degrades to demo data.
    Forecast {
        query: String,

        /// Number of forecast days.
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: u8,
    },

    /// Past conditions for one date. Plan-gated upstream; degrades to demo data.
    Historical {
        query: String,

        /// Date as YYYY-MM-DD; defaults to one week ago.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Ocean and coastal conditions. Plan-gated upstream; degrades to demo data.
    Marine { query: String },

    /// Search locations and manage favorites.
    #[command(subcommand)]
    Location(LocationCommand),
}

#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    /// Look up location candidates for a free-text query.
    Search { query: String },

    /// List favorited locations.
    List,

    /// Add a favorite interactively.
    Add,

    /// Remove a favorite by name (case-insensitive).
    Remove { name: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { query } => {
                let client = client_from_config()?;
                let generations = Generations::new();
                if let Some(view) = views::load_current(&generations, &client, &query).await {
                    views::render_current(&query, &view);
                }
                Ok(())
            }
            Command::Forecast { query, days } => {
                let client = client_from_config()?;
                let generations = Generations::new();
                let view = views::load_forecast(
                    &generations,
                    &client,
                    &FallbackGenerator,
                    &PlanGatePolicy::default(),
                    &query,
                    days,
                )
                .await;
                if let Some(view) = view {
                    views::render_forecast(&query, days, &view);
                }
                Ok(())
            }
            Command::Historical { query, date } => {
                let date = date.unwrap_or_else(|| {
                    Utc::now().date_naive() - Days::new(7)
                });
                let client = client_from_config()?;
                let generations = Generations::new();
                let view = views::load_historical(
                    &generations,
                    &client,
                    &FallbackGenerator,
                    &PlanGatePolicy::default(),
                    &query,
                    date,
                )
                .await;
                if let Some(view) = view {
                    views::render_historical(&query, &view);
                }
                Ok(())
            }
            Command::Marine { query } => {
                let client = client_from_config()?;
                let generations = Generations::new();
                let view = views::load_marine(
                    &generations,
                    &client,
                    &FallbackGenerator,
                    &PlanGatePolicy::default(),
                    &query,
                )
                .await;
                if let Some(view) = view {
                    views::render_marine(&query, &view);
                }
                Ok(())
            }
            Command::Location(location) => run_location(location).await,
        }
    }
}

async fn run_location(command: LocationCommand) -> anyhow::Result<()> {
    match command {
        LocationCommand::Search { query } => {
            let client = client_from_config()?;
            let generations = Generations::new();
            let view = views::load_search(
                &generations,
                &client,
                &FallbackGenerator,
                &PlanGatePolicy::default(),
                &query,
            )
            .await;
            if let Some(view) = view {
                views::render_search(&query, &view);
            }
            Ok(())
        }
        LocationCommand::List => {
            let favorites = open_favorites()?;
            println!("Favorite locations:");
            for (i, loc) in favorites.items().iter().enumerate() {
                println!(
                    "  {}. {} - {} ({:.2}, {:.2})",
                    i + 1,
                    loc.name,
                    loc.country,
                    loc.lat,
                    loc.lon
                );
            }
            Ok(())
        }
        LocationCommand::Add => {
            let mut favorites = open_favorites()?;

            let name = inquire::Text::new("Location name:")
                .prompt()
                .context("Failed to read location name")?;
            let country = inquire::Text::new("Country:")
                .prompt()
                .context("Failed to read country")?;
            let lat = inquire::CustomType::<f64>::new("Latitude:")
                .with_error_message("Enter a number, e.g. 48.86")
                .prompt()
                .context("Failed to read latitude")?;
            let lon = inquire::CustomType::<f64>::new("Longitude:")
                .with_error_message("Enter a number, e.g. 2.35")
                .prompt()
                .context("Failed to read longitude")?;

            let added = favorites.add(SavedLocation { name: name.clone(), country, lat, lon })?;
            if added {
                println!("Saved \"{name}\".");
            } else {
                println!("\"{name}\" is already a favorite.");
            }
            Ok(())
        }
        LocationCommand::Remove { name } => {
            let mut favorites = open_favorites()?;
            if favorites.remove(&name)? {
                println!("Removed \"{name}\".");
            } else {
                println!("No favorite named \"{name}\".");
            }
            Ok(())
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let access_key = inquire::Password::new("Provider access key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read access key")?;

    config.set_access_key(access_key);
    config.save()?;

    println!("Saved access key to {}", Config::config_file_path()?.display());
    Ok(())
}

fn client_from_config() -> anyhow::Result<WeatherClient> {
    Config::load()?.client()
}

fn open_favorites() -> anyhow::Result<Favorites> {
    let path = FileFavoritesStore::default_path()?;
    Favorites::open(Box::new(FileFavoritesStore::new(path)))
}
