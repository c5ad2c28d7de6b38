use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default scrape timeout, matching what e2e suites expect from a slow endpoint
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

/// Credentials sent with every scrape
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl AuthConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    /// The token to send, if any. An empty token counts as no token.
    pub fn token(&self) -> Option<&str> {
        self.bearer_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String, // http or https
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            path: default_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Load configuration from an optional TOML file and `METRICS_PROBE__*` env vars
///
/// Environment variables override the file, e.g.
/// `METRICS_PROBE__AUTH__BEARER_TOKEN` or `METRICS_PROBE__SCRAPE__SCHEME`.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ProbeConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let config = builder
        .add_source(config::Environment::with_prefix("METRICS_PROBE").separator("__"))
        .build()?;

    let cfg: ProbeConfig = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &ProbeConfig) -> anyhow::Result<()> {
    match cfg.scrape.scheme.as_str() {
        "http" | "https" => {}
        other => anyhow::bail!("Invalid scrape scheme '{}', must be http or https", other),
    }

    if !cfg.scrape.path.starts_with('/') {
        anyhow::bail!("Scrape path '{}' must start with '/'", cfg.scrape.path);
    }

    if cfg.scrape.timeout_seconds == 0 {
        anyhow::bail!("Scrape timeout must be greater than zero");
    }

    Ok(())
}
