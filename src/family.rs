//! Metric families parsed from the Prometheus text exposition format
//!
//! `prometheus-parse` hands back a flat list of samples. This module groups
//! consecutive samples of the same name and type back into families, which
//! is the shape the matcher works on. Input goes through
//! `exposition::normalize` first, so a malformed line fails the whole body.

use chrono::{DateTime, Utc};
use prometheus_parse::{Sample, Scrape, Value};
use std::fmt;

use crate::error::{ProbeError, ProbeResult};
use crate::exposition;

/// Declared type of a metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Untyped,
    Histogram,
    Summary,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Untyped => "untyped",
            MetricKind::Histogram => "histogram",
            MetricKind::Summary => "summary",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single label attached to a metric instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

/// Histogram bucket: cumulative count of observations below `upper_bound`
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    pub upper_bound: f64,
    pub cumulative_count: f64,
}

/// Summary quantile as reported by the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryQuantile {
    pub quantile: f64,
    pub value: f64,
}

/// Typed value carried by one metric instance
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Counter(f64),
    Gauge(f64),
    Untyped(f64),
    Histogram(Vec<HistogramBucket>),
    Summary(Vec<SummaryQuantile>),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Counter(_) => MetricKind::Counter,
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Untyped(_) => MetricKind::Untyped,
            MetricValue::Histogram(_) => MetricKind::Histogram,
            MetricValue::Summary(_) => MetricKind::Summary,
        }
    }
}

/// One time series within a family
#[derive(Debug, Clone)]
pub struct MetricInstance {
    /// Labels sorted by name
    pub labels: Vec<Label>,
    pub value: MetricValue,
    pub timestamp: DateTime<Utc>,
}

/// A named, typed group of metric instances
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub name: String,
    pub kind: MetricKind,
    pub metrics: Vec<MetricInstance>,
}

/// Parse Prometheus text format into families
///
/// Counter, gauge and untyped families come back in encounter order, and a
/// name that shows up in two separate blocks yields two families. Histogram
/// and summary families follow all of them, in no particular order.
///
/// # Errors
/// Returns `ProbeError::Parse` for the first malformed line; there is no
/// partial result.
pub fn parse_families(prometheus_text: &str) -> ProbeResult<Vec<MetricFamily>> {
    let lines = exposition::normalize(prometheus_text)?;
    let scrape = Scrape::parse(lines.into_iter().map(Ok))?;

    group_samples(scrape)
}

/// Parse a raw response body, rejecting anything that is not UTF-8
pub fn parse_body(body: &[u8]) -> ProbeResult<Vec<MetricFamily>> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ProbeError::Parse(format!("response body is not valid UTF-8: {}", e)))?;
    parse_families(text)
}

fn group_samples(scrape: Scrape) -> ProbeResult<Vec<MetricFamily>> {
    let mut families: Vec<MetricFamily> = Vec::new();

    for sample in scrape.samples {
        let instance = to_instance(&sample)?;
        let kind = instance.value.kind();

        match families.last_mut() {
            Some(family) if family.name == sample.metric && family.kind == kind => {
                family.metrics.push(instance);
            }
            _ => families.push(MetricFamily {
                name: sample.metric,
                kind,
                metrics: vec![instance],
            }),
        }
    }

    Ok(families)
}

fn to_instance(sample: &Sample) -> ProbeResult<MetricInstance> {
    let mut labels = sample
        .labels
        .iter()
        .map(|(name, value)| {
            Ok(Label {
                name: name.clone(),
                value: exposition::decode_label_value(name, value)?,
            })
        })
        .collect::<ProbeResult<Vec<Label>>>()?;
    labels.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(MetricInstance {
        labels,
        value: convert_value(&sample.value),
        timestamp: sample.timestamp,
    })
}

fn convert_value(value: &Value) -> MetricValue {
    match value {
        Value::Counter(v) => MetricValue::Counter(*v),
        Value::Gauge(v) => MetricValue::Gauge(*v),
        Value::Untyped(v) => MetricValue::Untyped(*v),
        Value::Histogram(buckets) => MetricValue::Histogram(
            buckets
                .iter()
                .map(|b| HistogramBucket {
                    upper_bound: b.less_than,
                    cumulative_count: b.count,
                })
                .collect(),
        ),
        Value::Summary(quantiles) => MetricValue::Summary(
            quantiles
                .iter()
                .map(|q| SummaryQuantile {
                    quantile: q.quantile,
                    value: q.count,
                })
                .collect(),
        ),
    }
}
