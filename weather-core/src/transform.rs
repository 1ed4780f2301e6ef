//! Reshapes raw OpenWeather payloads into the dashboard model.
//!
//! The forecast feed is a flat list of three-hourly samples. It is bucketed by
//! calendar date (first-seen order, at most [`MAX_FORECAST_DAYS`] buckets) and
//! each bucket is folded into a [`DailyAggregate`] carrying its samples as
//! hourly detail. Every fallback for a field the feed omits lives here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    model::{
        AirQualityReading, Astro, Condition, CurrentConditions, DailyAggregate, DaySummary,
        HourlyRecord, LocationInfo, WeatherSnapshot,
    },
    payload::{
        AirPollutionPayload, ConditionBlock, CurrentPayload, ForecastEntry, ForecastPayload,
        PrecipBlock, WindBlock,
    },
    units::{celsius_to_fahrenheit, compass_point, dew_point_c, hpa_to_inhg, mps_to_kph, mps_to_mph},
};

pub const MAX_FORECAST_DAYS: usize = 5;

/// The forecast feed carries neither visibility nor UV.
const FORECAST_VISIBILITY_KM: f64 = 10.0;
const FORECAST_DAILY_UV: f64 = 5.0;
const FORECAST_HOURLY_UV: f64 = 0.0;
/// The current-weather feed on the free tier has no UV either.
const CURRENT_UV: f64 = 5.0;
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

const UNKNOWN_CATEGORY: &str = "Unknown";

/// Samples sharing one calendar date.
pub type DayBucket<'a> = (NaiveDate, Vec<&'a ForecastEntry>);

/// Timestamp of a sample: `dt_txt` when parseable, otherwise `dt` in UTC.
pub fn sample_time(entry: &ForecastEntry) -> NaiveDateTime {
    entry
        .dt_txt
        .as_deref()
        .and_then(|txt| NaiveDateTime::parse_from_str(txt, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| DateTime::<Utc>::from_timestamp(entry.dt, 0).map(|dt| dt.naive_utc()))
        .unwrap_or_default()
}

/// Buckets samples by date in first-seen order. Dates past the fifth are dropped.
pub fn group_by_day(entries: &[ForecastEntry]) -> Vec<DayBucket<'_>> {
    let mut days: Vec<DayBucket<'_>> = Vec::new();

    for entry in entries {
        let date = sample_time(entry).date();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(entry),
            None => days.push((date, vec![entry])),
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days
}

fn category(entry: &ForecastEntry) -> &str {
    entry
        .weather
        .first()
        .map(|w| w.main.as_str())
        .unwrap_or(UNKNOWN_CATEGORY)
}

/// Most frequent condition category in a bucket.
///
/// Ties go to the category seen first. The returned block is the first sample
/// of the winning category; `None` only when no sample carries a condition.
pub fn dominant_condition<'a>(samples: &[&'a ForecastEntry]) -> Option<&'a ConditionBlock> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for &sample in samples {
        let key = category(sample);
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (key, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((key, n));
        }
    }
    let (winner, _) = best?;

    samples
        .iter()
        .copied()
        .find_map(|s| s.weather.first().filter(|w| w.main == winner))
}

pub fn icon_link(icon_base: &str, icon: &str) -> String {
    if icon.is_empty() {
        return String::new();
    }
    format!("{}/{icon}@2x.png", icon_base.trim_end_matches('/'))
}

fn condition(block: Option<&ConditionBlock>, icon_base: &str) -> Condition {
    match block {
        Some(w) => Condition {
            text: w.description.clone(),
            icon: icon_link(icon_base, &w.icon),
            code: w.id,
        },
        None => Condition {
            text: UNKNOWN_CATEGORY.to_string(),
            icon: String::new(),
            code: 0,
        },
    }
}

fn precip(block: Option<&PrecipBlock>, pick: fn(&PrecipBlock) -> Option<f64>) -> Option<f64> {
    block.and_then(pick)
}

/// Rain volume over the sample window, or snow when there is no rain block.
fn sample_precip(entry: &ForecastEntry) -> f64 {
    precip(entry.rain.as_ref(), |p| p.three_hours)
        .or_else(|| precip(entry.snow.as_ref(), |p| p.three_hours))
        .unwrap_or(0.0)
}

fn wind_speed(wind: Option<&WindBlock>) -> f64 {
    wind.map(|w| w.speed).unwrap_or(0.0)
}

fn gust_speed(wind: Option<&WindBlock>) -> f64 {
    wind.map(|w| w.gust.unwrap_or(w.speed)).unwrap_or(0.0)
}

pub fn hourly_record(entry: &ForecastEntry, icon_base: &str) -> HourlyRecord {
    let wind = entry.wind.as_ref();
    let speed = wind_speed(wind);
    let gust = gust_speed(wind);
    let temp_c = entry.main.temp;
    let feels_c = entry.main.feels_like;
    let dew_c = dew_point_c(temp_c, f64::from(entry.main.humidity));

    HourlyRecord {
        time: sample_time(entry),
        temp_c,
        temp_f: celsius_to_fahrenheit(temp_c),
        condition: condition(entry.weather.first(), icon_base),
        wind_kph: mps_to_kph(speed),
        wind_mph: mps_to_mph(speed),
        wind_dir: compass_point(wind.map(|w| w.deg).unwrap_or(0.0)).to_string(),
        gust_kph: mps_to_kph(gust),
        gust_mph: mps_to_mph(gust),
        pressure_mb: entry.main.pressure,
        precip_mm: sample_precip(entry),
        humidity: entry.main.humidity,
        cloud: entry.clouds.all,
        // Only one apparent temperature exists upstream; chill and heat index alias it.
        feelslike_c: feels_c,
        feelslike_f: celsius_to_fahrenheit(feels_c),
        windchill_c: feels_c,
        windchill_f: celsius_to_fahrenheit(feels_c),
        heatindex_c: feels_c,
        heatindex_f: celsius_to_fahrenheit(feels_c),
        dewpoint_c: dew_c,
        dewpoint_f: celsius_to_fahrenheit(dew_c),
        vis_km: FORECAST_VISIBILITY_KM,
        uv: FORECAST_HOURLY_UV,
    }
}

/// Folds one non-empty bucket into a day summary plus hourly detail.
pub fn daily_aggregate(
    date: NaiveDate,
    samples: &[&ForecastEntry],
    astro: &Astro,
    icon_base: &str,
) -> DailyAggregate {
    let count = samples.len().max(1) as f64;
    let temps = samples.iter().map(|s| s.main.temp);

    let max_c = temps.clone().fold(f64::NEG_INFINITY, f64::max);
    let min_c = temps.clone().fold(f64::INFINITY, f64::min);
    let avg_c = temps.sum::<f64>() / count;

    let max_wind = samples
        .iter()
        .map(|s| wind_speed(s.wind.as_ref()))
        .fold(0.0, f64::max);
    let total_precip: f64 = samples.iter().map(|s| sample_precip(s)).sum();
    let avg_humidity =
        samples.iter().map(|s| f64::from(s.main.humidity)).sum::<f64>() / count;

    DailyAggregate {
        date,
        day: DaySummary {
            maxtemp_c: max_c,
            maxtemp_f: celsius_to_fahrenheit(max_c),
            mintemp_c: min_c,
            mintemp_f: celsius_to_fahrenheit(min_c),
            avgtemp_c: avg_c,
            avgtemp_f: celsius_to_fahrenheit(avg_c),
            maxwind_kph: mps_to_kph(max_wind),
            maxwind_mph: mps_to_mph(max_wind),
            totalprecip_mm: total_precip,
            avgvis_km: FORECAST_VISIBILITY_KM,
            avghumidity: avg_humidity,
            condition: condition(dominant_condition(samples), icon_base),
            uv: FORECAST_DAILY_UV,
        },
        astro: astro.clone(),
        hour: samples.iter().map(|s| hourly_record(s, icon_base)).collect(),
    }
}

pub fn astro(current: &CurrentPayload) -> Astro {
    let at = |ts: Option<i64>| ts.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0));
    Astro {
        sunrise: at(current.sys.sunrise),
        sunset: at(current.sys.sunset),
    }
}

pub fn current_conditions(current: &CurrentPayload, icon_base: &str) -> CurrentConditions {
    let wind = Some(&current.wind);
    let speed = wind_speed(wind);
    let gust = gust_speed(wind);
    let temp_c = current.main.temp;
    let feels_c = current.main.feels_like;

    let precip_mm = precip(current.rain.as_ref(), |p| p.one_hour)
        .or_else(|| precip(current.snow.as_ref(), |p| p.one_hour))
        .unwrap_or(0.0);

    CurrentConditions {
        temp_c,
        temp_f: celsius_to_fahrenheit(temp_c),
        condition: condition(current.weather.first(), icon_base),
        wind_kph: mps_to_kph(speed),
        wind_mph: mps_to_mph(speed),
        wind_degree: current.wind.deg,
        wind_dir: compass_point(current.wind.deg).to_string(),
        gust_kph: mps_to_kph(gust),
        gust_mph: mps_to_mph(gust),
        pressure_mb: current.main.pressure,
        pressure_in: hpa_to_inhg(current.main.pressure),
        precip_mm,
        humidity: current.main.humidity,
        cloud: current.clouds.all,
        feelslike_c: feels_c,
        feelslike_f: celsius_to_fahrenheit(feels_c),
        vis_km: current.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0,
        uv: CURRENT_UV,
    }
}

/// Location block; local time is the observation time in the location's offset.
pub fn location_info(current: &CurrentPayload) -> LocationInfo {
    let country = current.sys.country.clone().unwrap_or_default();
    let localtime = chrono::FixedOffset::east_opt(current.timezone)
        .zip(DateTime::<Utc>::from_timestamp(current.dt, 0))
        .map(|(offset, at)| at.with_timezone(&offset))
        .unwrap_or_else(|| Utc::now().fixed_offset());

    LocationInfo {
        name: current.name.clone(),
        region: country.clone(),
        country,
        lat: current.coord.lat,
        lon: current.coord.lon,
        localtime,
    }
}

/// First (most recent) reading of the air-pollution feed.
pub fn air_quality_reading(payload: &AirPollutionPayload) -> Option<AirQualityReading> {
    let entry = payload.list.first()?;
    let c = &entry.components;
    Some(AirQualityReading {
        co: c.co,
        no2: c.no2,
        o3: c.o3,
        so2: c.so2,
        pm2_5: c.pm2_5,
        pm10: c.pm10,
        us_epa_index: entry.main.aqi,
        gb_defra_index: entry.main.aqi,
    })
}

pub fn build_snapshot(
    current: &CurrentPayload,
    forecast: &ForecastPayload,
    air_quality: Option<AirQualityReading>,
    icon_base: &str,
) -> WeatherSnapshot {
    let astro = astro(current);
    let forecast = group_by_day(&forecast.list)
        .into_iter()
        .map(|(date, samples)| daily_aggregate(date, &samples, &astro, icon_base))
        .collect();

    WeatherSnapshot {
        location: location_info(current),
        current: current_conditions(current, icon_base),
        forecast,
        air_quality,
        alerts: Vec::new(),
    }
}
