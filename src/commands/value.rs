use anyhow::Result;
use metrics_probe::MetricsProbe;

/// Execute the value command
///
/// A missing metric comes back as an error, so `main` reports it once and
/// exits non-zero; shell-based test scripts can rely on the status.
pub async fn execute(
    probe: &MetricsProbe,
    endpoint: &str,
    family: &str,
    labels: &[String],
) -> Result<()> {
    let value = probe.metric_value(endpoint, family, labels).await?;
    println!("{}", value);

    Ok(())
}
