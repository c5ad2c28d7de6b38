//! Logging helpers
//!
//! Bearer tokens are redacted before they reach any log line.

use std::fmt;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Log lines go to stderr so they never mix with command output on stdout.
/// Safe to call from every test: only the first call installs the subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt_layer::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Redacted bearer token
///
/// Only the first 4 characters are shown, the rest is replaced with `***`
#[derive(Clone, Debug)]
pub struct SensitiveToken<'a> {
    inner: &'a str,
}

impl<'a> SensitiveToken<'a> {
    pub fn new(token: &'a str) -> Self {
        Self { inner: token }
    }
}

impl<'a> fmt::Display for SensitiveToken<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 4;
        if self.inner.len() <= visible_len * 2 || !self.inner.is_char_boundary(visible_len) {
            // short tokens are hidden entirely
            write!(f, "***")
        } else {
            write!(f, "{}***", &self.inner[..visible_len])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_token_display() {
        let token = "eyJhbGciOiJSUzI1NiIsImtpZCI6IjEifQ";
        assert_eq!(SensitiveToken::new(token).to_string(), "eyJh***");
    }

    #[test]
    fn test_short_token_fully_masked() {
        assert_eq!(SensitiveToken::new("abc").to_string(), "***");
        assert_eq!(SensitiveToken::new("12345678").to_string(), "***");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
