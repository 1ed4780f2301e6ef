use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::{Config, Endpoints},
    error::{WeatherError, truncate_body},
    model::Coordinate,
    payload::{AirPollutionPayload, CurrentPayload, ForecastPayload, GeoMatch},
};

use super::WeatherSource;

/// HTTP client for the OpenWeather free tier.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: String,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| WeatherError::Client { source })?;

        Ok(Self {
            api_key,
            endpoints,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let api_key = config.require_api_key()?;
        Self::new(
            api_key,
            config.endpoints.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// GET `url` and decode the body, or describe why not.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        debug!(endpoint, %url, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(WeatherError::Upstream {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }

    fn coord_query(coord: Coordinate, metric: bool) -> Vec<(&'static str, String)> {
        let mut query = vec![("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())];
        if metric {
            query.push(("units", "metric".to_string()));
        }
        query
    }

    fn data_url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoints.data_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn geocode(&self, query: &str) -> Result<Vec<GeoMatch>, WeatherError> {
        let url = format!("{}/direct", self.endpoints.geo_url.trim_end_matches('/'));
        let params = [("q", query.to_string()), ("limit", "1".to_string())];

        match self.get_json::<Vec<GeoMatch>>("geocoding", url, &params).await {
            Ok(matches) => Ok(matches),
            Err(WeatherError::Upstream { status, .. }) => {
                debug!(%status, query, "geocoding rejected");
                Err(WeatherError::NotFound {
                    query: query.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }

    async fn current(&self, coord: Coordinate) -> Result<CurrentPayload, WeatherError> {
        self.get_json("current", self.data_url("weather"), &Self::coord_query(coord, true))
            .await
    }

    async fn forecast(&self, coord: Coordinate) -> Result<ForecastPayload, WeatherError> {
        self.get_json("forecast", self.data_url("forecast"), &Self::coord_query(coord, true))
            .await
    }

    async fn air_quality(&self, coord: Coordinate) -> Result<AirPollutionPayload, WeatherError> {
        self.get_json(
            "air quality",
            self.data_url("air_pollution"),
            &Self::coord_query(coord, false),
        )
        .await
    }

    fn icon_base(&self) -> &str {
        &self.endpoints.icon_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_api_key() {
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }
        let err = OpenWeatherClient::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
        assert!(err.to_string().contains("weatherpro configure"));
    }

    #[test]
    fn from_config_builds_client_with_key() {
        let mut config = Config::default();
        config.set_api_key("KEY".into());
        config.timeout_secs = 3;
        let client = OpenWeatherClient::from_config(&config).expect("client builds");
        assert_eq!(client.icon_base(), Endpoints::default().icon_url);
    }

    #[test]
    fn urls_tolerate_trailing_slash() {
        let endpoints = Endpoints {
            data_url: "http://localhost:1234/data/".into(),
            ..Endpoints::default()
        };
        let client = OpenWeatherClient::new("KEY".into(), endpoints, Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(client.data_url("weather"), "http://localhost:1234/data/weather");
    }

    #[test]
    fn coordinate_query_units() {
        let q = OpenWeatherClient::coord_query(Coordinate::new(1.5, -2.25), true);
        assert_eq!(q[0], ("lat", "1.5".to_string()));
        assert_eq!(q[1], ("lon", "-2.25".to_string()));
        assert_eq!(q[2], ("units", "metric".to_string()));
        assert_eq!(OpenWeatherClient::coord_query(Coordinate::new(0.0, 0.0), false).len(), 2);
    }
}
