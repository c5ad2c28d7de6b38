use thiserror::Error;

use crate::family::MetricKind;

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Errors returned by the probe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Label constraints must be name/value pairs
    #[error("received odd number of label arguments ({0}), labels must be key-value pairs")]
    OddLabelArguments(usize),

    /// The scrape URL could not be built
    #[error("invalid metrics endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection failure, timeout or body read failure
    #[error("failed to fetch metrics: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not a readable exposition
    #[error("failed to parse metrics: {0}")]
    Parse(String),

    /// The matched family is neither a counter, a gauge nor untyped
    #[error("unknown or unsupported metric type {0}")]
    UnsupportedType(MetricKind),

    /// No instance of the family carries the requested labels
    #[error("metric '{family}{{{labels}}}' not found")]
    NotFound { family: String, labels: String },
}

impl ProbeError {
    /// True when the family or matching instance is absent from the scrape
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Determine if an error is worth retrying
    ///
    /// Only connection failures and timeouts qualify. Everything else
    /// describes the scraped content or the caller's input and will fail
    /// the same way on the next attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::OddLabelArguments(_) => false,
            Self::InvalidEndpoint { .. } => false,
            Self::Parse(_) => false,
            Self::UnsupportedType(_) => false,
            Self::NotFound { .. } => false,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ProbeError::NotFound {
            family: "http_requests_total".to_string(),
            labels: "method=\"DELETE\"".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "metric 'http_requests_total{method=\"DELETE\"}' not found"
        );

        let error = ProbeError::UnsupportedType(MetricKind::Histogram);
        assert_eq!(error.to_string(), "unknown or unsupported metric type histogram");
    }

    #[test]
    fn test_not_found_classification() {
        let error = ProbeError::NotFound {
            family: "up".to_string(),
            labels: String::new(),
        };
        assert!(error.is_not_found());
        assert!(!error.is_transient());

        assert!(!ProbeError::OddLabelArguments(3).is_not_found());
        assert!(!ProbeError::Parse("bad".to_string()).is_not_found());
    }

    #[test]
    fn test_content_errors_are_not_transient() {
        assert!(!ProbeError::OddLabelArguments(1).is_transient());
        assert!(!ProbeError::Parse("bad".to_string()).is_transient());
        assert!(!ProbeError::UnsupportedType(MetricKind::Summary).is_transient());
    }

    #[test]
    fn test_io_error_maps_to_parse() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8");
        let error: ProbeError = io.into();
        assert!(matches!(error, ProbeError::Parse(_)));
    }
}
