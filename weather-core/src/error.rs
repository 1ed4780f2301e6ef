use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the resolver and the aggregator.
///
/// The dashboard shows every variant through a single error state, see
/// [`WeatherError::user_message`]. Air-quality failures never reach this type
/// at the aggregation boundary; they are logged and dropped.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Comma-separated input whose halves are not both valid floats.
    #[error("Invalid coordinates '{input}': expected \"lat,lon\"")]
    Parse { input: String },

    /// Geocoding returned zero matches or a non-success status.
    #[error("Location not found: {query}")]
    NotFound { query: String },

    /// A data endpoint answered with a non-success status.
    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Upstream {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The HTTP client could not be built, e.g. the TLS backend failed to load.
    #[error("Failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to reach OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weatherpro configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,

    #[error(
        "No home location configured.\n\
         Hint: run `weatherpro configure` or pass `--at lat,lon`."
    )]
    MissingHome,
}

impl WeatherError {
    /// Human-readable message for the dashboard's error state.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Parse { .. } | WeatherError::NotFound { .. } => {
                "Location not found".to_string()
            }
            WeatherError::Upstream { endpoint: "forecast", .. } => {
                "Forecast data not found".to_string()
            }
            WeatherError::Upstream { .. } | WeatherError::Decode { .. } => {
                "Weather data not found".to_string()
            }
            WeatherError::Client { .. } | WeatherError::Transport { .. } => {
                "Failed to fetch weather data".to_string()
            }
            WeatherError::MissingApiKey | WeatherError::MissingHome => self.to_string(),
        }
    }
}

/// Cut an upstream body down to something that fits in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
