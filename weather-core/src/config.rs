use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{error::WeatherError, model::Coordinate, resolver::parse_coordinates};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Upstream base URLs. Tests point these at a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Current weather, 5 day / 3 hour forecast and air pollution.
    pub data_url: String,
    /// Direct geocoding.
    pub geo_url: String,
    /// Condition icon images.
    pub icon_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            data_url: "https://api.openweathermap.org/data/2.5".to_string(),
            geo_url: "https://api.openweathermap.org/geo/1.0".to_string(),
            icon_url: "https://openweathermap.org/img/wn".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 10
/// home = "51.5073,-0.1276"
///
/// [endpoints]
/// data_url = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoints: Endpoints,
    pub timeout_secs: u64,
    /// Device position as `"lat,lon"`, used by `weatherpro here`.
    pub home: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoints: Endpoints::default(),
            timeout_secs: 10,
            home: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn require_api_key(&self) -> Result<String, WeatherError> {
        self.api_key().ok_or(WeatherError::MissingApiKey)
    }

    /// Validate and store the home position.
    pub fn set_home(&mut self, home: &str) -> Result<Coordinate, WeatherError> {
        let coord = parse_coordinates(home.trim())?;
        self.home = Some(coord.to_string());
        Ok(coord)
    }

    pub fn home_coordinate(&self) -> Result<Coordinate, WeatherError> {
        match self.home.as_deref().map(str::trim) {
            Some(home) if !home.is_empty() => parse_coordinates(home),
            _ => Err(WeatherError::MissingHome),
        }
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weatherpro", "weatherpro")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();
        assert!(cfg.endpoints.data_url.ends_with("/data/2.5"));
        assert!(cfg.endpoints.geo_url.ends_with("/geo/1.0"));
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "KEY"

            [endpoints]
            data_url = "http://localhost:9000"
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.endpoints.data_url, "http://localhost:9000");
        assert_eq!(cfg.endpoints.geo_url, Endpoints::default().geo_url);
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn toml_roundtrip_preserves_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back.api_key.as_deref(), Some("OPEN_KEY"));
        assert_eq!(back.endpoints, cfg.endpoints);
    }

    #[test]
    fn home_parses_from_toml() {
        let cfg: Config =
            toml::from_str(r#"home = " 59.91, 10.75 ""#).expect("config should parse");
        let home = cfg.home_coordinate().expect("home");
        assert_eq!(home, Coordinate::new(59.91, 10.75));
        assert_eq!(home.to_string(), "59.91,10.75");
    }

    #[test]
    fn home_missing_or_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.home_coordinate(), Err(WeatherError::MissingHome)));

        cfg.home = Some("  ".into());
        assert!(matches!(cfg.home_coordinate(), Err(WeatherError::MissingHome)));

        cfg.home = Some("north,south".into());
        assert!(matches!(cfg.home_coordinate(), Err(WeatherError::Parse { .. })));
    }

    #[test]
    fn set_home_normalises_and_rejects_garbage() {
        let mut cfg = Config::default();
        assert!(cfg.set_home("1,2,3").is_err());
        assert_eq!(cfg.home, None);

        cfg.set_home(" 40.7 , -74.0 ").expect("valid home");
        assert_eq!(cfg.home.as_deref(), Some("40.7,-74"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        if std::env::var(API_KEY_ENV).is_err() {
            assert!(matches!(cfg.require_api_key(), Err(WeatherError::MissingApiKey)));
        }
    }
}
