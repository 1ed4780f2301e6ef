use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{AirQualityReading, Coordinate, WeatherSnapshot},
    provider::WeatherSource,
    resolver::LocationResolver,
    transform,
};

/// Fetches the three feeds for a coordinate and builds a [`WeatherSnapshot`].
#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    source: Arc<dyn WeatherSource>,
    resolver: LocationResolver,
}

impl WeatherAggregator {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            resolver: LocationResolver::new(source.clone()),
            source,
        }
    }

    /// Resolve `query` and aggregate the weather there.
    pub async fn lookup(&self, query: &str) -> Result<WeatherSnapshot, WeatherError> {
        let coord = self.resolver.resolve(query).await?;
        self.aggregate(coord).await
    }

    /// Current conditions and forecast are required; air quality is not.
    #[instrument(skip(self), fields(lat = coord.lat, lon = coord.lon))]
    pub async fn aggregate(&self, coord: Coordinate) -> Result<WeatherSnapshot, WeatherError> {
        let (current, forecast) =
            tokio::try_join!(self.source.current(coord), self.source.forecast(coord))?;
        debug!(samples = forecast.list.len(), "fetched current and forecast");

        let air_quality = self.fetch_air_quality(coord).await;

        Ok(transform::build_snapshot(
            &current,
            &forecast,
            air_quality,
            self.source.icon_base(),
        ))
    }

    /// Best effort: any failure is logged and yields `None`.
    #[instrument(skip(self), fields(lat = coord.lat, lon = coord.lon))]
    pub async fn fetch_air_quality(&self, coord: Coordinate) -> Option<AirQualityReading> {
        match self.source.air_quality(coord).await {
            Ok(payload) => {
                let reading = transform::air_quality_reading(&payload);
                if reading.is_none() {
                    warn!("air quality feed returned no readings");
                }
                reading
            }
            Err(err) => {
                warn!(error = %err, "air quality data not available");
                None
            }
        }
    }
}
