//! Client-side preferences: temperature unit and saved locations.
//!
//! Stored as one JSON object whose keys are independent values, read once
//! when the store is opened and rewritten on every change.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{fs, path::PathBuf};
use tracing::warn;

use crate::{config::project_dirs, model::LocationInfo, units::TemperatureUnit};

const UNIT_KEY: &str = "temperatureUnit";
const LOCATIONS_KEY: &str = "savedLocations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLocation {
    pub id: String,
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
    pub is_favorite: bool,
}

impl SavedLocation {
    /// Resolver input that reselects this location without geocoding.
    pub fn query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PreferenceStore {
    /// Store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let path = project_dirs()?.data_dir().join("preferences.json");
        Self::open(path)
    }

    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                values: Map::new(),
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
        let values = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", path.display()))?;

        Ok(Self { path, values })
    }

    fn get<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(value) = self.values.get(key) else {
            return T::default();
        };
        serde_json::from_value(value.clone()).unwrap_or_else(|err| {
            warn!(key, error = %err, "ignoring unreadable preference");
            T::default()
        })
    }

    fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize preference '{key}'"))?;
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.values)
            .context("Failed to serialize preferences")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.get(UNIT_KEY)
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) -> Result<()> {
        self.put(UNIT_KEY, &unit)
    }

    pub fn saved_locations(&self) -> Vec<SavedLocation> {
        self.get(LOCATIONS_KEY)
    }

    /// Saved locations with favorites first, otherwise in insertion order.
    pub fn saved_locations_sorted(&self) -> Vec<SavedLocation> {
        let mut all = self.saved_locations();
        all.sort_by_key(|loc| !loc.is_favorite);
        all
    }

    /// Add a resolved location unless one with the same name is already saved.
    pub fn remember(&mut self, location: &LocationInfo) -> Result<Option<SavedLocation>> {
        let mut all = self.saved_locations();
        if all.iter().any(|loc| loc.name == location.name) {
            return Ok(None);
        }

        let mut stamp = Utc::now().timestamp_millis();
        while all.iter().any(|loc| loc.id == stamp.to_string()) {
            stamp += 1;
        }

        let saved = SavedLocation {
            id: stamp.to_string(),
            name: location.name.clone(),
            country: location.country.clone(),
            region: location.region.clone(),
            lat: location.lat,
            lon: location.lon,
            is_favorite: false,
        };
        all.push(saved.clone());
        self.put(LOCATIONS_KEY, &all)?;
        Ok(Some(saved))
    }

    /// Flip the favorite flag; `false` when no location has that id.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let mut all = self.saved_locations();
        let Some(loc) = all.iter_mut().find(|loc| loc.id == id) else {
            return Ok(false);
        };
        loc.is_favorite = !loc.is_favorite;
        self.put(LOCATIONS_KEY, &all)?;
        Ok(true)
    }

    /// Drop a saved location; `false` when no location has that id.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let mut all = self.saved_locations();
        let before = all.len();
        all.retain(|loc| loc.id != id);
        if all.len() == before {
            return Ok(false);
        }
        self.put(LOCATIONS_KEY, &all)?;
        Ok(true)
    }
}
