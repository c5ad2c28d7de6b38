//! Query operations used from integration and e2e tests
//!
//! Every call fetches and parses the endpoint from scratch; nothing is cached
//! between calls.

use std::collections::HashMap;
use tracing::debug;

use crate::config::{AuthConfig, ProbeConfig, ScrapeConfig};
use crate::error::ProbeResult;
use crate::family::{parse_body, MetricFamily};
use crate::matcher::{collect_labels, find_value, LabelConstraints};
use crate::scrape::MetricsFetcher;

/// Value of the instance of `family` carrying exactly `labels`
///
/// `labels` alternates names and values: `&["method", "GET"]`. The lookup
/// goes to `https://{endpoint}/metrics` with a 30 second timeout.
///
/// # Errors
/// `OddLabelArguments` before any request if `labels` has odd length,
/// `NotFound` if no instance matches, plus transport, parse and
/// unsupported-type errors.
pub async fn get_metric_value<S: AsRef<str>>(
    auth: &AuthConfig,
    endpoint: &str,
    family: &str,
    labels: &[S],
) -> ProbeResult<f64> {
    let probe = MetricsProbe::new(ProbeConfig {
        auth: auth.clone(),
        scrape: ScrapeConfig::default(),
    });
    probe.metric_value(endpoint, family, labels).await
}

/// Labels of every instance of `family`, one map per instance
///
/// An absent family yields an empty vector rather than an error.
pub async fn get_metric_labels(
    auth: &AuthConfig,
    endpoint: &str,
    family: &str,
) -> ProbeResult<Vec<HashMap<String, String>>> {
    let probe = MetricsProbe::new(ProbeConfig {
        auth: auth.clone(),
        scrape: ScrapeConfig::default(),
    });
    probe.metric_labels(endpoint, family).await
}

/// Reusable probe settings for callers that query many metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsProbe {
    config: ProbeConfig,
}

impl MetricsProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub async fn metric_value<S: AsRef<str>>(
        &self,
        endpoint: &str,
        family: &str,
        labels: &[S],
    ) -> ProbeResult<f64> {
        let constraints = LabelConstraints::from_flat(labels)?;
        let families = self.families(endpoint).await?;

        let value = find_value(&families, family, &constraints)?;
        debug!(family, labels = %constraints.describe(), value, "Found metric value");
        Ok(value)
    }

    pub async fn metric_labels(
        &self,
        endpoint: &str,
        family: &str,
    ) -> ProbeResult<Vec<HashMap<String, String>>> {
        let families = self.families(endpoint).await?;

        let labels = collect_labels(&families, family);
        debug!(family, instances = labels.len(), "Collected metric labels");
        Ok(labels)
    }

    /// Fetch and parse every family the endpoint exposes
    pub async fn families(&self, endpoint: &str) -> ProbeResult<Vec<MetricFamily>> {
        let fetcher = MetricsFetcher::new(&self.config.auth, &self.config.scrape, endpoint)?;
        let body = fetcher.fetch().await?;

        let families = parse_body(&body)?;
        debug!(url = %fetcher.url(), families = families.len(), "Parsed metrics");
        Ok(families)
    }
}
