//! Plain-text rendering of the board.

use std::fmt::{self, Write};

use chrono::{DateTime, TimeZone};
use weatherboard_core::{
    ConditionKind, DashboardState,
    clock::{format_date, format_time},
};

pub const PROMPT: &str = "Enter city name and press Enter (:q to quit)";

/// Single-column glyphs, so padding by `char` count keeps the forecast rows aligned.
fn icon(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Clear => "☀",
        ConditionKind::Clouds => "☁",
        ConditionKind::Rain => "☂",
        ConditionKind::Snow => "❄",
    }
}

fn forecast_row(cells: &[String]) -> String {
    let row: String = cells.iter().map(|cell| format!("{cell:<6}")).collect();
    row.trim_end().to_string()
}

/// Render the whole board as it should appear at `now`.
pub fn render_board<Z>(state: &DashboardState, now: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let mut out = String::new();

    if let Some(error) = &state.error {
        let _ = writeln!(out, "! {error}");
    }

    if state.loading {
        out.push_str("Loading...\n");
        return out;
    }

    let Some(current) = &state.current else {
        return out;
    };

    let location = if current.country.is_empty() {
        state.city.clone()
    } else {
        format!("{}, {}", state.city, current.country)
    };

    let _ = writeln!(out, "== {location} ==");
    let _ = writeln!(out, "   {}   {}", format_time(now), format_date(now));
    out.push('\n');

    let _ = writeln!(out, "   {}  {}°  {}", icon(current.kind()), current.temperature_c, current.description);
    let _ = writeln!(out, "       Feels like {}°", current.feels_like_c);
    out.push('\n');

    let visibility = current
        .visibility_km
        .map(|km| format!("{km} km"))
        .unwrap_or_else(|| "n/a".to_string());

    let _ = writeln!(out, "   {:<11}{}%", "Humidity", current.humidity_pct);
    let _ = writeln!(out, "   {:<11}{} km/h", "Wind", current.wind_speed_kmh);
    let _ = writeln!(out, "   {:<11}{} hPa", "Pressure", current.pressure_hpa);
    let _ = writeln!(out, "   {:<11}{}", "Visibility", visibility);

    if !state.forecast.is_empty() {
        out.push('\n');
        let days: Vec<String> = state.forecast.iter().map(|d| d.day.clone()).collect();
        let icons: Vec<String> = state.forecast.iter().map(|d| icon(d.kind()).to_string()).collect();
        let temps: Vec<String> =
            state.forecast.iter().map(|d| format!("{}°", d.temperature_c)).collect();

        for cells in [days, icons, temps] {
            let _ = writeln!(out, "   {}", forecast_row(&cells));
        }

        out.push('\n');
        for day in &state.forecast {
            let _ = writeln!(out, "   {:<6}{}", day.day, day.description);
        }
    }

    out
}
