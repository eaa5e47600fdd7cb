//! Dashboard state and the search flow that feeds it.
//!
//! All mutations go through [`DashboardState::apply`]. Every search is tagged
//! with a [`RequestToken`]; results carrying anything but the latest token are
//! dropped, so a slow search can never overwrite a newer one.
//!
//! A failed search keeps the previously displayed weather on screen and only
//! sets the error message.

use std::fmt;

use chrono::TimeZone;
use log::{debug, info, warn};
use tokio::sync::watch;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastDay},
    normalize::normalize_forecast,
    provider::WeatherProvider,
};

/// Monotonically increasing search id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the render layer needs to draw the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// City the displayed weather belongs to.
    pub city: String,
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastDay>,
    pub loading: bool,
    pub error: Option<String>,
    latest: RequestToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Started {
        token: RequestToken,
        city: String,
    },
    Loaded {
        token: RequestToken,
        city: String,
        current: CurrentConditions,
        forecast: Vec<ForecastDay>,
    },
    Failed {
        token: RequestToken,
        message: String,
    },
}

impl DashboardState {
    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Token for the next search. Only becomes the latest once `Started` is applied.
    pub fn next_token(&self) -> RequestToken {
        self.latest.next()
    }

    /// Apply `action`; returns `false` if it was stale and ignored.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Started { token, city } => {
                if token <= self.latest {
                    return false;
                }
                debug!("search {token} started for '{city}'");
                self.latest = token;
                self.loading = true;
                self.error = None;
            }
            Action::Loaded { token, city, current, forecast } => {
                if token != self.latest {
                    return false;
                }
                self.city = city;
                self.current = Some(current);
                self.forecast = forecast;
                self.loading = false;
            }
            Action::Failed { token, message } => {
                if token != self.latest {
                    return false;
                }
                self.error = Some(message);
                self.loading = false;
            }
        }

        true
    }
}

/// How a search ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The result (success or failure) is now on the board.
    Applied,
    /// A newer search was started meanwhile; the result was dropped.
    Stale,
}

/// Owns the provider, the observer zone and the board state.
#[derive(Debug)]
pub struct Dashboard<Z: TimeZone> {
    provider: Box<dyn WeatherProvider>,
    zone: Z,
    state: watch::Sender<DashboardState>,
}

impl<Z> Dashboard<Z>
where
    Z: TimeZone + Send + Sync,
    Z::Offset: fmt::Display,
{
    pub fn new(provider: Box<dyn WeatherProvider>, zone: Z) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self { provider, zone, state }
    }

    pub fn zone(&self) -> &Z {
        &self.zone
    }

    /// Receiver that is notified whenever the board changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Search for `input`. Blank input is ignored and returns `None`.
    ///
    /// The forecast is only requested once current conditions succeeded.
    pub async fn search(&self, input: &str) -> Option<Settled> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }

        let mut token = RequestToken::default();
        self.state.send_modify(|state| {
            token = state.next_token();
            state.apply(Action::Started { token, city: city.to_string() });
        });
        info!("searching weather for '{city}' ({token})");

        let action = match self.fetch(city).await {
            Ok((current, forecast)) => Action::Loaded {
                token,
                city: city.to_string(),
                current,
                forecast,
            },
            Err(err) => {
                warn!("search {token} for '{city}' failed: {err}");
                Action::Failed { token, message: err.user_message() }
            }
        };

        if self.dispatch(action) {
            Some(Settled::Applied)
        } else {
            debug!("discarding stale result of search {token}");
            Some(Settled::Stale)
        }
    }

    async fn fetch(&self, city: &str) -> Result<(CurrentConditions, Vec<ForecastDay>), WeatherError> {
        let current = self.provider.fetch_current(city).await?;
        let samples = self.provider.fetch_forecast(city).await?;
        let forecast = normalize_forecast(&samples, &self.zone)?;
        Ok((current, forecast))
    }

    fn dispatch(&self, action: Action) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            applied = state.apply(action);
            applied
        });
        applied
    }
}
