//! Plain-text rendering of the dashboard tabs.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::Write;

use weatherpro_core::{SavedLocation, TemperatureUnit, WeatherSnapshot};

use crate::cli::Tab;

pub fn tab(snapshot: &WeatherSnapshot, tab: Tab, unit: TemperatureUnit) -> String {
    let mut out = header(snapshot);
    match tab {
        Tab::Current => current(&mut out, snapshot, unit),
        Tab::Forecast => forecast(&mut out, snapshot, unit),
        Tab::Hourly => hourly(&mut out, snapshot, unit),
        Tab::Air => air(&mut out, snapshot),
        Tab::Alerts => alerts(&mut out, snapshot),
    }
    out
}

fn temp(unit: TemperatureUnit, c: f64, f: f64) -> String {
    format!("{:.0}{}", unit.pick(c, f), unit.symbol())
}

fn local_clock(at: Option<DateTime<Utc>>, offset: &FixedOffset) -> String {
    at.map(|t| t.with_timezone(offset).format("%I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn header(snapshot: &WeatherSnapshot) -> String {
    let loc = &snapshot.location;
    let mut out = format!(
        "{}, {}  ({:.4}, {:.4})  {}\n",
        loc.name,
        loc.country,
        loc.lat,
        loc.lon,
        loc.localtime.format("%a %d %b %H:%M"),
    );
    if !snapshot.alerts.is_empty() {
        let n = snapshot.alerts.len();
        let _ = writeln!(out, "! {n} weather alert{} active", if n > 1 { "s" } else { "" });
    }
    out
}

fn current(out: &mut String, snapshot: &WeatherSnapshot, unit: TemperatureUnit) {
    let c = &snapshot.current;
    let _ = writeln!(
        out,
        "{}  {} (feels like {})",
        temp(unit, c.temp_c, c.temp_f),
        c.condition.text,
        temp(unit, c.feelslike_c, c.feelslike_f),
    );
    let _ = writeln!(
        out,
        "Wind {:.0} km/h {} (gusts {:.0} km/h)  Humidity {}%  Clouds {}%",
        c.wind_kph, c.wind_dir, c.gust_kph, c.humidity, c.cloud,
    );
    let _ = writeln!(
        out,
        "Pressure {:.0} mb / {:.2} in  Visibility {:.1} km  Precip {:.1} mm  UV {:.0}",
        c.pressure_mb, c.pressure_in, c.vis_km, c.precip_mm, c.uv,
    );
    if let Some(today) = snapshot.forecast.first() {
        let offset = snapshot.location.localtime.offset();
        let _ = writeln!(
            out,
            "Sunrise {}  Sunset {}",
            local_clock(today.astro.sunrise, offset),
            local_clock(today.astro.sunset, offset),
        );
    }
    out.push('\n');
    forecast(out, snapshot, unit);
}

fn forecast(out: &mut String, snapshot: &WeatherSnapshot, unit: TemperatureUnit) {
    let _ = writeln!(out, "{}-day forecast", snapshot.forecast.len());
    for day in &snapshot.forecast {
        let d = &day.day;
        let _ = writeln!(
            out,
            "  {}  {:>5} / {:<5}  {:<20} wind {:>3.0} km/h  rain {:>4.1} mm  humidity {:.0}%",
            day.date.format("%a %d %b"),
            temp(unit, d.maxtemp_c, d.maxtemp_f),
            temp(unit, d.mintemp_c, d.mintemp_f),
            d.condition.text,
            d.maxwind_kph,
            d.totalprecip_mm,
            d.avghumidity,
        );
    }
}

fn hourly(out: &mut String, snapshot: &WeatherSnapshot, unit: TemperatureUnit) {
    let Some(today) = snapshot.forecast.first() else {
        let _ = writeln!(out, "No hourly forecast available.");
        return;
    };
    let _ = writeln!(out, "Hourly forecast for {}", today.date.format("%a %d %b"));
    for h in &today.hour {
        let _ = writeln!(
            out,
            "  {}  {:>5}  {:<20} wind {:>3.0} km/h {:<3}  dew {}  humidity {}%",
            h.time.format("%H:%M"),
            temp(unit, h.temp_c, h.temp_f),
            h.condition.text,
            h.wind_kph,
            h.wind_dir,
            temp(unit, h.dewpoint_c, h.dewpoint_f),
            h.humidity,
        );
    }
}

fn air(out: &mut String, snapshot: &WeatherSnapshot) {
    let Some(aq) = &snapshot.air_quality else {
        let _ = writeln!(out, "Air quality data not available.");
        return;
    };
    let _ = writeln!(out, "Air quality: {}", aq.category().label());
    for (name, value) in [
        ("PM2.5", aq.pm2_5),
        ("PM10", aq.pm10),
        ("CO", aq.co),
        ("NO2", aq.no2),
        ("O3", aq.o3),
        ("SO2", aq.so2),
    ] {
        let _ = writeln!(out, "  {name:<6} {value:>8.2} μg/m³");
    }
    let _ = writeln!(out, "{}", aq.health_advice());
}

fn alerts(out: &mut String, snapshot: &WeatherSnapshot) {
    if snapshot.alerts.is_empty() {
        let _ = writeln!(out, "No active weather alerts.");
        return;
    }
    for alert in &snapshot.alerts {
        let _ = writeln!(
            out,
            "[{}] {}: {}\n  {} .. {}\n  {}",
            alert.severity,
            alert.event,
            alert.headline,
            alert.effective.format("%d %b %H:%M"),
            alert.expires.format("%d %b %H:%M"),
            alert.desc,
        );
    }
}

pub fn saved_locations(locations: &[SavedLocation]) -> String {
    if locations.is_empty() {
        return "No saved locations yet. Search for a place with `weatherpro show <name>`.\n"
            .to_string();
    }
    let mut out = String::new();
    for loc in locations {
        let _ = writeln!(
            out,
            "{} {:<14} {}, {}  ({:.4}, {:.4})",
            if loc.is_favorite { "*" } else { " " },
            loc.id,
            loc.name,
            loc.country,
            loc.lat,
            loc.lon,
        );
    }
    out
}
