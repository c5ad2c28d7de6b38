/// Tests for the metrics-probe binary output streams
use httpmock::prelude::*;
use std::process::{Command, Output};

const EXPOSITION: &str = "# TYPE queue_length gauge\nqueue_length{queue=\"default\"} 4\n";

fn run_probe(server: &MockServer, args: &[&str]) -> Output {
    let endpoint = server.address().to_string();
    let (command, rest) = args.split_first().unwrap();

    Command::new(env!("CARGO_BIN_EXE_metrics-probe"))
        .args(["--scheme", "http", *command, endpoint.as_str()])
        .args(rest)
        .env("RUST_LOG", "warn")
        .env_remove("METRICS_PROBE_TOKEN")
        .output()
        .unwrap()
}

#[test]
fn test_value_keeps_stdout_clean_on_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/metrics");
        then.status(500).body(EXPOSITION);
    });

    let output = run_probe(&server, &["value", "queue_length", "queue", "default"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "4\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-success status"), "{}", stderr);
}

#[test]
fn test_labels_json_is_the_only_stdout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/metrics");
        then.status(500).body(EXPOSITION);
    });

    let output = run_probe(&server, &["labels", "queue_length", "--json"]);

    assert!(output.status.success());
    let labels: Vec<std::collections::HashMap<String, String>> =
        serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(labels[0]["queue"], "default");
}

#[test]
fn test_missing_value_is_reported_once() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/metrics");
        then.status(200).body(EXPOSITION);
    });

    let output = run_probe(&server, &["value", "queue_length", "queue", "urgent"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("not found").count(), 1, "{}", stderr);
    assert!(stderr.contains(r#"queue="urgent""#), "{}", stderr);
}
