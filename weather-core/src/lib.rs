//! Core library for the `weatherpro` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Typed OpenWeather payloads and the source abstraction over them
//! - Location resolution and forecast aggregation into a display model
//! - Dashboard state guarded against stale responses
//! - Client-side preferences (unit, saved locations)
//!
//! It is used by `weatherpro-cli`, but can also back other front ends.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod store;
pub mod transform;
pub mod units;

pub use aggregator::WeatherAggregator;
pub use config::{Config, Endpoints};
pub use error::WeatherError;
pub use model::{
    AirQualityCategory, AirQualityReading, Coordinate, CurrentConditions, DailyAggregate,
    HourlyRecord, LocationInfo, WeatherAlert, WeatherSnapshot,
};
pub use provider::{OpenWeatherClient, WeatherSource};
pub use resolver::LocationResolver;
pub use session::{Dashboard, DashboardState, Outcome, Ticket};
pub use store::{PreferenceStore, SavedLocation};
pub use units::TemperatureUnit;
