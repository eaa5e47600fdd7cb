use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of the weather right now, already converted to display units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i64,
    pub feels_like_c: i64,
    /// Provider condition category, e.g. "Rain" or "Clouds".
    pub condition: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: i64,
    pub pressure_hpa: u32,
    /// `None` when the provider omits visibility.
    pub visibility_km: Option<u32>,
    pub country: String,
}

impl CurrentConditions {
    pub fn kind(&self) -> ConditionKind {
        ConditionKind::from_category(&self.condition)
    }
}

/// One forecast point before day-level aggregation.
///
/// Condition and description are optional because the wire format allows an
/// empty `weather` array; the normalizer rejects such a sample only if it keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// Unix timestamp, seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub condition: Option<String>,
    pub description: Option<String>,
}

/// One entry of the forecast row, one per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub day: String,
    pub temperature_c: i64,
    /// Lowercased condition category, e.g. "rain".
    pub condition: String,
    pub description: String,
}

impl ForecastDay {
    pub fn kind(&self) -> ConditionKind {
        ConditionKind::from_category(&self.condition)
    }
}

/// Coarse weather family used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Clear,
    Clouds,
    Rain,
    Snow,
}

impl ConditionKind {
    /// Unknown categories fall back to [`ConditionKind::Clear`].
    pub fn from_category(category: &str) -> Self {
        match category.to_lowercase().as_str() {
            "rain" | "drizzle" => ConditionKind::Rain,
            "clouds" => ConditionKind::Clouds,
            "snow" => ConditionKind::Snow,
            _ => ConditionKind::Clear,
        }
    }
}
