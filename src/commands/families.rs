use anyhow::Result;
use colored::Colorize;
use metrics_probe::MetricsProbe;

/// Execute the families command
pub async fn execute(probe: &MetricsProbe, endpoint: &str) -> Result<()> {
    let families = probe.families(endpoint).await?;

    println!("{}", format!("{} families", families.len()).bold());
    for family in &families {
        println!(
            "  {} {} ({} instances)",
            family.name.cyan(),
            family.kind.to_string().dimmed(),
            family.metrics.len()
        );
    }

    Ok(())
}
