//! Turns user input into coordinates.
//!
//! `"lat,lon"` is parsed locally; anything else goes through a single
//! geocoding lookup where the first match wins.

use std::sync::Arc;
use tracing::debug;

use crate::{error::WeatherError, model::Coordinate, provider::WeatherSource};

#[derive(Debug, Clone)]
pub struct LocationResolver {
    source: Arc<dyn WeatherSource>,
}

impl LocationResolver {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, query: &str) -> Result<Coordinate, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::Parse {
                input: query.to_string(),
            });
        }

        if query.contains(',') {
            return parse_coordinates(query);
        }

        debug!(query, "geocoding location");
        let first = self
            .source
            .geocode(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound {
                query: query.to_string(),
            })?;

        debug!(name = %first.name, lat = first.lat, lon = first.lon, "resolved location");
        Ok(Coordinate::new(first.lat, first.lon))
    }
}

/// Parse `"lat,lon"` without touching the network.
pub fn parse_coordinates(input: &str) -> Result<Coordinate, WeatherError> {
    let parse_err = || WeatherError::Parse {
        input: input.to_string(),
    };

    let mut parts = input.split(',');
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(parse_err());
    };

    let lat: f64 = lat.trim().parse().map_err(|_| parse_err())?;
    let lon: f64 = lon.trim().parse().map_err(|_| parse_err())?;
    if !lat.is_finite() || !lon.is_finite() {
        return Err(parse_err());
    }

    Ok(Coordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{AirPollutionPayload, CurrentPayload, ForecastPayload, GeoMatch};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder stub that counts calls and returns a fixed list.
    #[derive(Debug, Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
        matches: Vec<(f64, f64)>,
    }

    #[async_trait]
    impl WeatherSource for CountingGeocoder {
        async fn geocode(&self, query: &str) -> Result<Vec<GeoMatch>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .matches
                .iter()
                .map(|&(lat, lon)| GeoMatch {
                    name: query.to_string(),
                    lat,
                    lon,
                })
                .collect())
        }

        async fn current(&self, _: Coordinate) -> Result<CurrentPayload, WeatherError> {
            unreachable!("resolver never fetches weather")
        }

        async fn forecast(&self, _: Coordinate) -> Result<ForecastPayload, WeatherError> {
            unreachable!("resolver never fetches weather")
        }

        async fn air_quality(&self, _: Coordinate) -> Result<AirPollutionPayload, WeatherError> {
            unreachable!("resolver never fetches weather")
        }

        fn icon_base(&self) -> &str {
            ""
        }
    }

    fn resolver(matches: Vec<(f64, f64)>) -> (LocationResolver, Arc<CountingGeocoder>) {
        let geo = Arc::new(CountingGeocoder {
            calls: AtomicUsize::new(0),
            matches,
        });
        (LocationResolver::new(geo.clone()), geo)
    }

    #[tokio::test]
    async fn coordinates_skip_the_network() {
        let (resolver, geo) = resolver(vec![(0.0, 0.0)]);

        let coord = resolver.resolve("40.7128, -74.0060").await.expect("coords");
        assert_eq!(coord, Coordinate::new(40.7128, -74.006));
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_coordinates_are_parse_errors() {
        let (resolver, geo) = resolver(vec![]);

        for input in ["abc,12", "12,", "1,2,3", ",", "NaN,1"] {
            let err = resolver.resolve(input).await.unwrap_err();
            assert!(matches!(err, WeatherError::Parse { .. }), "{input}: {err:?}");
        }
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_geocoding_match_wins() {
        let (resolver, geo) = resolver(vec![(51.5, -0.12), (42.98, -81.24)]);

        let coord = resolver.resolve("London").await.expect("match");
        assert_eq!(coord, Coordinate::new(51.5, -0.12));
        assert_eq!(geo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_matches_is_not_found() {
        let (resolver, _) = resolver(vec![]);

        let err = resolver.resolve("Atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound { ref query } if query == "Atlantis"));
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let (resolver, geo) = resolver(vec![(1.0, 1.0)]);
        assert!(resolver.resolve("   ").await.is_err());
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
    }
}
