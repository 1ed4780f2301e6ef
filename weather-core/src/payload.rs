//! Typed shapes of the OpenWeather responses this crate consumes.
//!
//! Only the fields the transformation reads are declared. Anything the feed
//! may omit is an `Option` or `#[serde(default)]`; the fallbacks themselves
//! are applied in [`crate::transform`].

use serde::Deserialize;

/// One hit from `geo/1.0/direct`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoMatch {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
    pub feels_like: f64,
    /// Sea-level pressure in hPa.
    pub pressure: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindBlock {
    /// m/s
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudsBlock {
    #[serde(default)]
    pub all: u8,
}

/// Rain or snow volume in mm over the last hour / three hours.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrecipBlock {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionBlock {
    pub id: u32,
    /// Category, e.g. "Rain" or "Clear".
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SysBlock {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

/// Response of `data/2.5/weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    pub coord: Coord,
    #[serde(default)]
    pub name: String,
    pub dt: i64,
    /// Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: i32,
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    #[serde(default)]
    pub wind: WindBlock,
    #[serde(default)]
    pub clouds: CloudsBlock,
    #[serde(default)]
    pub rain: Option<PrecipBlock>,
    #[serde(default)]
    pub snow: Option<PrecipBlock>,
    /// Metres.
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub sys: SysBlock,
}

/// One three-hourly sample of `data/2.5/forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    /// "YYYY-MM-DD HH:MM:SS" in UTC.
    #[serde(default)]
    pub dt_txt: Option<String>,
    pub main: MainBlock,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    #[serde(default)]
    pub wind: Option<WindBlock>,
    #[serde(default)]
    pub clouds: CloudsBlock,
    #[serde(default)]
    pub rain: Option<PrecipBlock>,
    #[serde(default)]
    pub snow: Option<PrecipBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AqiBlock {
    /// 1 (good) ..= 5 (very poor).
    pub aqi: u8,
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AqiBlock,
    #[serde(default)]
    pub components: Components,
}

/// Response of `data/2.5/air_pollution`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionPayload {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_match_keeps_only_name_and_position() {
        let hits: Vec<GeoMatch> = serde_json::from_str(
            r#"[{ "name": "Oslo", "lat": 59.91, "lon": 10.75, "country": "NO", "state": "Oslo" }]"#,
        )
        .expect("geocoding payload");
        assert_eq!(hits[0].name, "Oslo");
        assert_eq!((hits[0].lat, hits[0].lon), (59.91, 10.75));
    }

    #[test]
    fn forecast_entry_tolerates_missing_optional_blocks() {
        let entry: ForecastEntry = serde_json::from_value(serde_json::json!({
            "dt": 1_700_000_000,
            "main": { "temp": 3.5, "feels_like": 1.0, "pressure": 1012, "humidity": 90 },
            "weather": [{ "id": 600, "main": "Snow", "description": "light snow", "icon": "13n" }],
            "snow": { "3h": 0.4 }
        }))
        .expect("entry should parse");

        assert!(entry.wind.is_none());
        assert!(entry.rain.is_none());
        assert_eq!(entry.snow.and_then(|s| s.three_hours), Some(0.4));
        assert_eq!(entry.clouds.all, 0);
    }

    #[test]
    fn current_payload_reads_sys_and_precip() {
        let current: CurrentPayload = serde_json::from_value(serde_json::json!({
            "coord": { "lat": 51.5, "lon": -0.12 },
            "name": "London",
            "dt": 1_700_000_000,
            "timezone": 0,
            "main": { "temp": 9.0, "feels_like": 7.0, "pressure": 1001, "humidity": 81 },
            "weather": [],
            "rain": { "1h": 1.2 },
            "sys": { "country": "GB", "sunrise": 1_699_975_000, "sunset": 1_700_008_000 }
        }))
        .expect("current should parse");

        assert_eq!(current.sys.country.as_deref(), Some("GB"));
        assert_eq!(current.rain.and_then(|r| r.one_hour), Some(1.2));
        assert!(current.visibility.is_none());
    }
}
