use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::Coordinate,
    payload::{AirPollutionPayload, CurrentPayload, ForecastPayload, GeoMatch},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Raw upstream feeds the resolver and aggregator are built on.
///
/// Implementations only fetch and decode; all reshaping happens in
/// [`crate::transform`].
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Free-text lookup, at most one match.
    async fn geocode(&self, query: &str) -> Result<Vec<GeoMatch>, WeatherError>;

    async fn current(&self, coord: Coordinate) -> Result<CurrentPayload, WeatherError>;

    async fn forecast(&self, coord: Coordinate) -> Result<ForecastPayload, WeatherError>;

    async fn air_quality(&self, coord: Coordinate) -> Result<AirPollutionPayload, WeatherError>;

    /// Base URL condition icon codes are resolved against.
    fn icon_base(&self) -> &str;
}
