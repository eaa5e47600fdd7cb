use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching or shaping weather data.
///
/// Only [`WeatherError::NotFound`] is a recognized failure with a fixed
/// user-facing message; every other variant is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The current-conditions lookup returned a non-success status.
    #[error("City not found")]
    NotFound,

    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Request to weather provider failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The forecast endpoint answered with a non-success status.
    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The provider answered, but the payload could not be decoded.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// A forecast sample kept by the normalizer is missing data.
    #[error("Malformed forecast sample at {timestamp}: {reason}")]
    MalformedSample { timestamp: i64, reason: String },
}

impl WeatherError {
    /// The message the dashboard shows for this error.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_has_fixed_message() {
        assert_eq!(WeatherError::NotFound.user_message(), "City not found");
    }

    #[test]
    fn other_errors_surface_their_details() {
        let err = WeatherError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "rate limited".to_string(),
        };

        let msg = err.user_message();
        assert!(msg.contains("429"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn malformed_sample_names_timestamp() {
        let err = WeatherError::MalformedSample {
            timestamp: 1_700_000_000,
            reason: "missing condition".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Malformed forecast sample at 1700000000: missing condition"
        );
    }
}
