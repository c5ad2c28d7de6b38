use metrics_probe::config::load_config;
use std::io::Write;

#[test]
fn test_load_config_defaults_without_file() -> anyhow::Result<()> {
    let cfg = load_config(None)?;

    assert_eq!(cfg.scrape.scheme, "https");
    assert_eq!(cfg.scrape.path, "/metrics");
    assert_eq!(cfg.scrape.timeout_seconds, 30);
    Ok(())
}

#[test]
fn test_load_config_from_toml_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[auth]
bearer_token = "file-token"

[scrape]
scheme = "http"
timeout_seconds = 5
"#
    )?;

    let cfg = load_config(Some(file.path()))?;

    assert_eq!(cfg.auth.token(), Some("file-token"));
    assert_eq!(cfg.scrape.scheme, "http");
    assert_eq!(cfg.scrape.timeout_seconds, 5);
    // Unset keys keep their defaults
    assert_eq!(cfg.scrape.path, "/metrics");
    Ok(())
}

#[test]
fn test_load_config_rejects_invalid_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[scrape]\nscheme = \"gopher\"")?;

    let result = load_config(Some(file.path()));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid scrape scheme"));
    Ok(())
}
