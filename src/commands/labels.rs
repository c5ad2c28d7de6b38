use anyhow::Result;
use colored::Colorize;
use metrics_probe::MetricsProbe;
use std::collections::{BTreeMap, HashMap};

/// Execute the labels command
pub async fn execute(probe: &MetricsProbe, endpoint: &str, family: &str, json: bool) -> Result<()> {
    let labels = probe.metric_labels(endpoint, family).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&labels)?);
        return Ok(());
    }

    if labels.is_empty() {
        println!("{}", format!("No instances of '{}'", family).yellow());
        return Ok(());
    }

    for lbls in &labels {
        println!("{}{{{}}}", family.cyan(), format_labels(lbls));
    }

    Ok(())
}

/// Render a label map as `a="1",b="2"`, sorted by name
fn format_labels(labels: &HashMap<String, String>) -> String {
    let sorted: BTreeMap<_, _> = labels.iter().collect();
    sorted
        .into_iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, value))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels_sorted() {
        let mut labels = HashMap::new();
        labels.insert("method".to_string(), "GET".to_string());
        labels.insert("code".to_string(), "200".to_string());

        assert_eq!(format_labels(&labels), "code=\"200\",method=\"GET\"");
    }

    #[test]
    fn test_format_labels_empty() {
        assert_eq!(format_labels(&HashMap::new()), "");
    }
}
