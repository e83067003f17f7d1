use thiserror::Error;

use crate::provider::Feed;

/// Errors surfaced by the provider clients.
///
/// Missing data is never an error: absent samples or fields become `None`
/// or empty collections further down the pipeline.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("{feed} returned a malformed response: {reason}")]
    MalformedResponse { feed: Feed, reason: String },

    #[error("{feed} reported failure {code}: {message}")]
    ProviderStatus { feed: Feed, code: String, message: String },

    #[error("{feed} request failed with HTTP status {status}")]
    HttpStatus { feed: Feed, status: u16 },

    #[error("{feed} request failed: {source}")]
    Transport {
        feed: Feed,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "No service key configured.\n\
         Hint: run `forecast configure` or set FORECAST_SERVICE_KEY."
    )]
    MissingServiceKey,
}

impl ForecastError {
    pub fn malformed(feed: Feed, reason: impl Into<String>) -> Self {
        Self::MalformedResponse { feed, reason: reason.into() }
    }

    /// The request itself was rejected or answered with garbage. Retrying the
    /// same request will not help.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse { .. } | Self::ProviderStatus { .. } | Self::HttpStatus { .. }
        )
    }

    pub fn feed(&self) -> Option<Feed> {
        match self {
            Self::MalformedResponse { feed, .. }
            | Self::ProviderStatus { feed, .. }
            | Self::HttpStatus { feed, .. }
            | Self::Transport { feed, .. } => Some(*feed),
            Self::MissingServiceKey => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_groups_shape_and_status_failures() {
        assert!(ForecastError::malformed(Feed::ShortRange, "no header").is_malformed());
        assert!(
            ForecastError::ProviderStatus {
                feed: Feed::MidTemperature,
                code: "10".into(),
                message: "INVALID_REQUEST_PARAMETER_ERROR".into(),
            }
            .is_malformed()
        );
        assert!(ForecastError::HttpStatus { feed: Feed::MidLand, status: 401 }.is_malformed());
        assert!(!ForecastError::MissingServiceKey.is_malformed());
    }

    #[test]
    fn messages_name_the_feed() {
        let err = ForecastError::malformed(Feed::ShortRange, "missing header.resultCode");
        assert_eq!(
            err.to_string(),
            "short-range forecast returned a malformed response: missing header.resultCode"
        );
        assert_eq!(err.feed(), Some(Feed::ShortRange));
    }

    #[test]
    fn missing_key_has_hint() {
        let msg = ForecastError::MissingServiceKey.to_string();
        assert!(msg.contains("No service key configured"));
        assert!(msg.contains("forecast configure"));
    }
}
