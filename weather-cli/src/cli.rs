use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, Text};
use std::sync::Arc;
use tracing::info;

use weatherpro_core::{
    Config, Dashboard, OpenWeatherClient, PreferenceStore, TemperatureUnit, WeatherAggregator,
    resolver::parse_coordinates,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherpro", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which part of the dashboard to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    Current,
    Forecast,
    Hourly,
    Air,
    Alerts,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a place.
    Show {
        /// Place name, or "lat,lon".
        location: String,

        #[arg(long, value_enum, default_value_t = Tab::Current)]
        tab: Tab,

        /// Override the saved unit preference for this run.
        #[arg(long)]
        unit: Option<TemperatureUnit>,
    },

    /// Show weather at the device position (the configured home).
    Here {
        /// Use this "lat,lon" instead of the configured home.
        #[arg(long)]
        at: Option<String>,

        #[arg(long, value_enum, default_value_t = Tab::Current)]
        tab: Tab,

        #[arg(long)]
        unit: Option<TemperatureUnit>,
    },

    /// List saved locations, favorites first.
    Saved,

    /// Show weather for a saved location by id.
    Open {
        id: String,

        #[arg(long, value_enum, default_value_t = Tab::Current)]
        tab: Tab,
    },

    /// Toggle the favorite flag of a saved location.
    Favorite { id: String },

    /// Remove a saved location.
    Forget { id: String },

    /// Set the preferred temperature unit.
    Unit { unit: TemperatureUnit },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                tab,
                unit,
            } => {
                let mut store = PreferenceStore::open_default()?;
                let unit = unit.unwrap_or_else(|| store.unit());
                show(&Config::load()?, &mut store, &location, tab, unit).await
            }
            Command::Here { at, tab, unit } => {
                let config = Config::load()?;
                let coord = match at {
                    Some(at) => parse_coordinates(at.trim())?,
                    None => config.home_coordinate()?,
                };
                let mut store = PreferenceStore::open_default()?;
                let unit = unit.unwrap_or_else(|| store.unit());
                show(&config, &mut store, &coord.to_string(), tab, unit).await
            }
            Command::Saved => {
                let store = PreferenceStore::open_default()?;
                print!("{}", render::saved_locations(&store.saved_locations_sorted()));
                Ok(())
            }
            Command::Open { id, tab } => {
                let mut store = PreferenceStore::open_default()?;
                let saved = store
                    .saved_locations()
                    .into_iter()
                    .find(|loc| loc.id == id)
                    .ok_or_else(|| anyhow!("No saved location with id '{id}'"))?;
                let unit = store.unit();
                show(&Config::load()?, &mut store, &saved.query(), tab, unit).await
            }
            Command::Favorite { id } => {
                let mut store = PreferenceStore::open_default()?;
                if !store.toggle_favorite(&id)? {
                    bail!("No saved location with id '{id}'");
                }
                Ok(())
            }
            Command::Forget { id } => {
                let mut store = PreferenceStore::open_default()?;
                if !store.remove(&id)? {
                    bail!("No saved location with id '{id}'");
                }
                Ok(())
            }
            Command::Unit { unit } => {
                let mut store = PreferenceStore::open_default()?;
                store.set_unit(unit)?;
                println!("Temperatures will be shown in {unit}.");
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get a free key at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());

    let home = Text::new("Home location (lat,lon):")
        .with_help_message("Used by `weatherpro here`; leave blank to keep the current one")
        .prompt()
        .context("Failed to read home location")?;
    if !home.trim().is_empty() {
        config.set_home(&home)?;
    }

    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    config: &Config,
    store: &mut PreferenceStore,
    location: &str,
    tab: Tab,
    unit: TemperatureUnit,
) -> anyhow::Result<()> {
    let client = OpenWeatherClient::from_config(config)?;
    let dashboard = Dashboard::new(WeatherAggregator::new(Arc::new(client)));

    dashboard.select(location).await;
    let state = dashboard.state();
    if let Some(message) = state.error {
        bail!("Weather data unavailable: {message}");
    }
    let snapshot = state
        .snapshot
        .ok_or_else(|| anyhow!("Weather data unavailable"))?;

    // Coordinates come from saved entries or `here`; only names are remembered.
    if !location.contains(',') {
        if let Some(saved) = store.remember(&snapshot.location)? {
            info!(id = %saved.id, name = %saved.name, "saved location");
        }
    }

    print!("{}", render::tab(&snapshot, tab, unit));
    Ok(())
}
