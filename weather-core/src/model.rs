use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Absolute icon URL.
    pub icon: String,
    pub code: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub country: String,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
    pub localtime: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub wind_degree: f64,
    pub wind_dir: String,
    pub gust_kph: f64,
    pub gust_mph: f64,
    pub pressure_mb: f64,
    pub pressure_in: f64,
    pub precip_mm: f64,
    pub humidity: u8,
    pub cloud: u8,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub vis_km: f64,
    pub uv: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub maxwind_kph: f64,
    pub maxwind_mph: f64,
    pub totalprecip_mm: f64,
    pub avgvis_km: f64,
    pub avghumidity: f64,
    pub condition: Condition,
    pub uv: f64,
}

/// Sun times for a forecast day.
///
/// The feed only reports today's values, so every day repeats them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

/// One upstream sample, reshaped for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub time: NaiveDateTime,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub wind_dir: String,
    pub gust_kph: f64,
    pub gust_mph: f64,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub humidity: u8,
    pub cloud: u8,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub windchill_c: f64,
    pub windchill_f: f64,
    pub heatindex_c: f64,
    pub heatindex_f: f64,
    pub dewpoint_c: f64,
    pub dewpoint_f: f64,
    pub vis_km: f64,
    pub uv: f64,
}

/// Summary of one calendar day of forecast samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub day: DaySummary,
    pub astro: Astro,
    pub hour: Vec<HourlyRecord>,
}

/// Categorical air-quality band on the US scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirQualityCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AirQualityCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    /// Upstream 1..=5 index; the feed has a single scale, so both fields match.
    pub us_epa_index: u8,
    pub gb_defra_index: u8,
}

impl AirQualityReading {
    /// Band for the index stretched onto the 0..500 US scale (`index × 50`).
    pub fn category(&self) -> AirQualityCategory {
        match u32::from(self.us_epa_index) * 50 {
            0..=50 => AirQualityCategory::Good,
            51..=100 => AirQualityCategory::Moderate,
            101..=150 => AirQualityCategory::UnhealthyForSensitiveGroups,
            151..=200 => AirQualityCategory::Unhealthy,
            201..=300 => AirQualityCategory::VeryUnhealthy,
            _ => AirQualityCategory::Hazardous,
        }
    }

    pub fn health_advice(&self) -> &'static str {
        match self.us_epa_index {
            0..=2 => "Air quality is good. Great day for outdoor activities!",
            3..=4 => "Air quality is moderate. Consider limiting prolonged outdoor activities.",
            _ => "Air quality is poor. Avoid outdoor activities and keep windows closed.",
        }
    }
}

/// Severe weather alert. The feed tier in use never returns any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub headline: String,
    pub severity: String,
    pub event: String,
    pub effective: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub desc: String,
}

/// Result of one successful aggregation; replaced wholesale by the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    /// At most five days, in date order.
    pub forecast: Vec<DailyAggregate>,
    pub air_quality: Option<AirQualityReading>,
    pub alerts: Vec<WeatherAlert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(index: u8) -> AirQualityReading {
        AirQualityReading {
            co: 0.0,
            no2: 0.0,
            o3: 0.0,
            so2: 0.0,
            pm2_5: 0.0,
            pm10: 0.0,
            us_epa_index: index,
            gb_defra_index: index,
        }
    }

    #[test]
    fn air_quality_bands() {
        assert_eq!(reading(1).category(), AirQualityCategory::Good);
        assert_eq!(reading(2).category(), AirQualityCategory::Moderate);
        assert_eq!(reading(3).category(), AirQualityCategory::UnhealthyForSensitiveGroups);
        assert_eq!(reading(4).category(), AirQualityCategory::Unhealthy);
        assert_eq!(reading(5).category(), AirQualityCategory::VeryUnhealthy);
        assert_eq!(reading(7).category(), AirQualityCategory::Hazardous);
    }

    #[test]
    fn health_advice_thresholds() {
        assert!(reading(2).health_advice().starts_with("Air quality is good"));
        assert!(reading(4).health_advice().contains("moderate"));
        assert!(reading(5).health_advice().contains("poor"));
    }

    #[test]
    fn coordinate_display_is_resolver_input() {
        assert_eq!(Coordinate::new(40.7, -74.0).to_string(), "40.7,-74");
    }
}
