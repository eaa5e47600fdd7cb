use crate::{
    Config,
    error::WeatherError,
    model::{CurrentConditions, ForecastSample},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of weather data for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions, converted to display units.
    ///
    /// A city the provider does not know must yield [`WeatherError::NotFound`].
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError>;

    /// Raw forecast samples in ascending timestamp order.
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `weatherboard configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::with_base_url(api_key, config.base_url.clone());
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeatherMap API key configured"));
        assert!(msg.contains("Hint: run `weatherboard configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
