//! Command implementations for the CLI
//!
//! - value: Print the value of one metric instance
//! - labels: Print the labels of every instance of a family
//! - families: List the families an endpoint exposes

pub mod families;
pub mod labels;
pub mod value;

use anyhow::{Context, Result};
use metrics_probe::config::{self, ProbeConfig};
use metrics_probe::MetricsProbe;

use crate::cli::Cli;

/// Build the probe from the config file, env vars and CLI overrides
pub fn build_probe(args: &Cli) -> Result<MetricsProbe> {
    let mut cfg = config::load_config(args.config.as_deref()).context("loading configuration")?;
    apply_overrides(&mut cfg, args);
    config::validate_config(&cfg)?;

    Ok(MetricsProbe::new(cfg))
}

fn apply_overrides(cfg: &mut ProbeConfig, args: &Cli) {
    if let Some(token) = &args.token {
        cfg.auth.bearer_token = Some(token.clone());
    }
    if let Some(scheme) = &args.scheme {
        cfg.scrape.scheme = scheme.clone();
    }
    if let Some(timeout) = args.timeout {
        cfg.scrape.timeout_seconds = timeout;
    }
}
