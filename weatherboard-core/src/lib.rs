//! Core library for the `weatherboard` dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather provider abstraction and its OpenWeatherMap client
//! - Forecast normalization (one entry per calendar day)
//! - Dashboard state, its reducer and the search flow
//! - The live clock
//!
//! It is used by `weatherboard-cli`, but any other front end can drive a
//! [`Dashboard`] and subscribe to its state.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;

pub use config::Config;
pub use dashboard::{Action, Dashboard, DashboardState, RequestToken, Settled};
pub use error::WeatherError;
pub use model::{ConditionKind, CurrentConditions, ForecastDay, ForecastSample};
pub use normalize::{MAX_FORECAST_DAYS, normalize_forecast};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
