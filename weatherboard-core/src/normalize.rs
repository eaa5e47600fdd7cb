//! Turning raw provider data into what the dashboard displays.
//!
//! The forecast endpoint returns samples every three hours. The dashboard shows
//! one entry per calendar day, taken from the first sample of that day, and at
//! most [`MAX_FORECAST_DAYS`] of them. Calendar days are computed in an explicit
//! observer timezone so results never depend on the host's clock settings.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    error::WeatherError,
    model::{ForecastDay, ForecastSample},
};

pub const MAX_FORECAST_DAYS: usize = 6;

/// Collapse forecast samples to one [`ForecastDay`] per calendar day in `zone`.
///
/// Samples are expected in non-decreasing timestamp order; the first sample seen
/// for a day wins. Only samples that end up in the output are validated.
pub fn normalize_forecast<Z>(
    samples: &[ForecastSample],
    zone: &Z,
) -> Result<Vec<ForecastDay>, WeatherError>
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        if days.len() >= MAX_FORECAST_DAYS {
            continue;
        }

        let local = local_time(sample.timestamp, zone)?;
        let key = local.date_naive();

        if seen.insert(key) {
            days.push(forecast_day(sample, &local)?);
        }
    }

    Ok(days)
}

fn local_time<Z: TimeZone>(timestamp: i64, zone: &Z) -> Result<DateTime<Z>, WeatherError> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(zone))
        .ok_or_else(|| malformed(timestamp, "timestamp out of range"))
}

fn forecast_day<Z>(sample: &ForecastSample, local: &DateTime<Z>) -> Result<ForecastDay, WeatherError>
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    if !sample.temperature_c.is_finite() {
        return Err(malformed(sample.timestamp, "temperature is not a finite number"));
    }

    let condition = sample
        .condition
        .as_deref()
        .ok_or_else(|| malformed(sample.timestamp, "missing condition"))?;

    let description = sample
        .description
        .as_deref()
        .ok_or_else(|| malformed(sample.timestamp, "missing description"))?;

    Ok(ForecastDay {
        date: local.date_naive(),
        day: local.format("%a").to_string(),
        temperature_c: round_half_up(sample.temperature_c),
        condition: condition.to_lowercase(),
        description: description.to_string(),
    })
}

fn malformed(timestamp: i64, reason: &str) -> WeatherError {
    WeatherError::MalformedSample { timestamp, reason: reason.to_string() }
}

/// Nearest integer, with halves rounded towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    // `f64::round` breaks ties away from zero; pull negative ties back up.
    let rounded = value.round();
    if value - rounded == 0.5 { rounded as i64 + 1 } else { rounded as i64 }
}

/// Wind speed in km/h from the provider's m/s.
pub fn wind_kmh(speed_mps: f64) -> i64 {
    round_half_up(speed_mps * 3.6)
}

/// Visibility in whole kilometres; truncates, never rounds up.
pub fn visibility_km(meters: u32) -> u32 {
    meters / 1000
}
