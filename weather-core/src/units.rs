use serde::{Deserialize, Serialize};

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn mps_to_kph(mps: f64) -> f64 {
    mps * 3.6
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * 2.237
}

pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa * 0.02953
}

/// Rough dew point from temperature and relative humidity.
///
/// Only meaningful above ~50 % humidity; it is what the dashboard has always
/// displayed, not a psychrometric calculation.
pub fn dew_point_c(temp_c: f64, humidity: f64) -> f64 {
    temp_c - (100.0 - humidity) / 5.0
}

/// Nearest of the 16 compass points for a bearing in degrees.
pub fn compass_point(degrees: f64) -> &'static str {
    let sector = (degrees / 22.5).round().rem_euclid(16.0) as usize;
    COMPASS[sector % 16]
}

/// Display unit for temperatures, persisted as `"celsius"` / `"fahrenheit"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn pick(self, celsius: f64, fahrenheit: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => fahrenheit,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(format!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_points_at_sector_edges() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(360.0), "N");
        assert_eq!(compass_point(11.0), "N");
        assert_eq!(compass_point(349.0), "N");
        assert_eq!(compass_point(12.0), "NNE");
        assert_eq!(compass_point(225.0), "SW");
        assert_eq!(compass_point(-90.0), "W");
    }

    #[test]
    fn fahrenheit_conversion() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn wind_and_pressure_conversions() {
        assert!((mps_to_kph(10.0) - 36.0).abs() < 1e-9);
        assert!((mps_to_mph(10.0) - 22.37).abs() < 1e-9);
        assert!((hpa_to_inhg(1000.0) - 29.53).abs() < 1e-9);
    }

    #[test]
    fn dew_point_approximation() {
        assert_eq!(dew_point_c(20.0, 100.0), 20.0);
        assert_eq!(dew_point_c(20.0, 50.0), 10.0);
    }

    #[test]
    fn unit_parses_and_serializes_lowercase() {
        assert_eq!("F".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
        assert_eq!(
            serde_json::to_string(&TemperatureUnit::Celsius).expect("serialize"),
            "\"celsius\""
        );
        assert_eq!(TemperatureUnit::Fahrenheit.pick(10.0, 50.0), 50.0);
    }
}
