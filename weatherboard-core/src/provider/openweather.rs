use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastSample},
    normalize::{round_half_up, visibility_km, wind_kmh},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `{base_url}/{endpoint}` for `city` in metric units.
    async fn get(&self, endpoint: &str, city: &str) -> Result<(reqwest::StatusCode, String), WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {url} q={city}");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!("{endpoint} answered {status} ({} bytes)", body.len());

        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed.weather.into_iter().next().ok_or_else(|| {
            WeatherError::Parse("current conditions response has no weather entry".to_string())
        })?;

        Ok(CurrentConditions {
            temperature_c: round_half_up(parsed.main.temp),
            feels_like_c: round_half_up(parsed.main.feels_like),
            condition: weather.main,
            description: weather.description,
            humidity_pct: parsed.main.humidity,
            wind_speed_kmh: wind_kmh(parsed.wind.speed),
            pressure_hpa: parsed.main.pressure,
            visibility_km: parsed.visibility.map(visibility_km),
            country: parsed.sys.country,
        })
    }
}

impl From<OwForecastEntry> for ForecastSample {
    fn from(entry: OwForecastEntry) -> Self {
        let weather = entry.weather.into_iter().next();

        ForecastSample {
            timestamp: entry.dt,
            temperature_c: entry.main.temp,
            condition: weather.as_ref().map(|w| w.main.clone()),
            description: weather.map(|w| w.description),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let (status, body) = self.get("weather", city).await?;

        if !status.is_success() {
            warn!("current conditions for '{city}' failed with {status}: {}", truncate_body(&body));
            return Err(WeatherError::NotFound);
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Parse(format!("OpenWeather current conditions JSON: {e}"))
        })?;

        CurrentConditions::try_from(parsed)
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, WeatherError> {
        let (status, body) = self.get("forecast", city).await?;

        if !status.is_success() {
            return Err(WeatherError::Status { status, body: truncate_body(&body) });
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("OpenWeather forecast JSON: {e}")))?;

        Ok(parsed.list.into_iter().map(ForecastSample::from).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 11.5, "feels_like": 10.49, "temp_min": 10.0, "temp_max": 12.0,
                 "pressure": 1012, "humidity": 81},
        "visibility": 9999,
        "wind": {"speed": 4.1, "deg": 250},
        "dt": 1705312800,
        "sys": {"country": "GB"},
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn current_response_is_projected_with_unit_conversions() {
        let parsed: OwCurrentResponse = serde_json::from_str(CURRENT).unwrap();
        let current = CurrentConditions::try_from(parsed).unwrap();

        assert_eq!(current.temperature_c, 12);
        assert_eq!(current.feels_like_c, 10);
        assert_eq!(current.condition, "Rain");
        assert_eq!(current.description, "light rain");
        assert_eq!(current.humidity_pct, 81);
        assert_eq!(current.wind_speed_kmh, 15);
        assert_eq!(current.pressure_hpa, 1012);
        assert_eq!(current.visibility_km, Some(9));
        assert_eq!(current.country, "GB");
    }

    #[test]
    fn current_response_without_weather_entry_is_rejected() {
        let json = r#"{
            "weather": [],
            "main": {"temp": 1.0, "feels_like": 1.0, "pressure": 1000, "humidity": 50},
            "wind": {"speed": 0.0}
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();

        let err = CurrentConditions::try_from(parsed).unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[test]
    fn missing_visibility_and_country_are_tolerated() {
        let json = r#"{
            "weather": [{"main": "Clear", "description": "clear sky"}],
            "main": {"temp": 20.0, "feels_like": 19.0, "pressure": 1020, "humidity": 40},
            "wind": {"speed": 1.0}
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        let current = CurrentConditions::try_from(parsed).unwrap();

        assert_eq!(current.visibility_km, None);
        assert_eq!(current.country, "");
    }

    #[test]
    fn forecast_entry_without_weather_keeps_gaps() {
        let json = r#"{"dt": 1705312800, "main": {"temp": 3.2}, "weather": []}"#;
        let entry: OwForecastEntry = serde_json::from_str(json).unwrap();
        let sample = ForecastSample::from(entry);

        assert_eq!(sample.timestamp, 1_705_312_800);
        assert_eq!(sample.condition, None);
        assert_eq!(sample.description, None);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let provider = OpenWeatherProvider::with_base_url("k".into(), "http://host/api/".into());
        assert_eq!(provider.base_url, "http://host/api");
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
