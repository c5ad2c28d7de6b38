//! Metrics fetcher for retrieving Prometheus metrics from an HTTP(S) endpoint
//!
//! Certificate verification is disabled: the endpoints under test usually
//! serve self-signed certificates.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::{AuthConfig, ScrapeConfig};
use crate::error::{ProbeError, ProbeResult};
use crate::logging::SensitiveToken;

/// HTTP client wrapper for fetching one endpoint's metrics
pub struct MetricsFetcher {
    client: Client,
    url: Url,
    token: Option<String>,
}

impl MetricsFetcher {
    /// Create a new metrics fetcher
    ///
    /// # Arguments
    /// * `endpoint` - host and port of the target, e.g. "10.0.0.5:8443"
    ///
    /// # Errors
    /// Returns an error if the URL cannot be built or the client cannot be
    /// constructed.
    pub fn new(auth: &AuthConfig, scrape: &ScrapeConfig, endpoint: &str) -> ProbeResult<Self> {
        let url = build_url(scrape, endpoint)?;
        let client = Client::builder()
            .timeout(scrape.timeout())
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            url,
            token: auth.token().map(str::to_string),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the exposition body
    ///
    /// The body is returned whatever the HTTP status; a non-2xx answer usually
    /// surfaces later as a missing metric.
    ///
    /// # Errors
    /// Returns an error if the request fails, times out, or the body cannot
    /// be read.
    pub async fn fetch(&self) -> ProbeResult<Vec<u8>> {
        let mut request = self.client.get(self.url.clone());
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let redacted = self.token.as_deref().map(|t| SensitiveToken::new(t).to_string());
        debug!(url = %self.url, token = ?redacted, "Fetching metrics");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = %status, "Metrics endpoint returned non-success status");
        }

        let body = response.bytes().await?;
        debug!(url = %self.url, bytes = body.len(), "Fetched metrics");

        Ok(body.to_vec())
    }
}

/// Build `{scheme}://{endpoint}{path}`
pub fn build_url(scrape: &ScrapeConfig, endpoint: &str) -> ProbeResult<Url> {
    let raw = format!("{}://{}{}", scrape.scheme, endpoint, scrape.path);
    Url::parse(&raw).map_err(|source| ProbeError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_defaults() {
        let url = build_url(&ScrapeConfig::default(), "localhost:9090").unwrap();
        assert_eq!(url.as_str(), "https://localhost:9090/metrics");
    }

    #[test]
    fn test_build_url_custom_scheme_and_path() {
        let scrape = ScrapeConfig {
            scheme: "http".to_string(),
            path: "/internal/metrics".to_string(),
            ..ScrapeConfig::default()
        };
        let url = build_url(&scrape, "10.0.0.5:8080").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5:8080/internal/metrics");
    }

    #[test]
    fn test_build_url_rejects_bad_endpoint() {
        let result = build_url(&ScrapeConfig::default(), "host:notaport");
        assert!(matches!(result, Err(ProbeError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_fetcher_creation() {
        let fetcher = MetricsFetcher::new(
            &AuthConfig::with_token("secret"),
            &ScrapeConfig::default(),
            "localhost:8443",
        )
        .unwrap();
        assert_eq!(fetcher.url().as_str(), "https://localhost:8443/metrics");
        assert_eq!(fetcher.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_fetcher_drops_empty_token() {
        let fetcher = MetricsFetcher::new(
            &AuthConfig::with_token(""),
            &ScrapeConfig::default(),
            "localhost:8443",
        )
        .unwrap();
        assert!(fetcher.token.is_none());
    }
}
