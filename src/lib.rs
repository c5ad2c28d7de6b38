pub mod config;
pub mod error;
mod exposition;
pub mod family;
pub mod logging;
pub mod matcher;
pub mod probe;
pub mod scrape;

pub use config::{AuthConfig, ProbeConfig, ScrapeConfig};
pub use error::{ProbeError, ProbeResult};
pub use family::{Label, MetricFamily, MetricInstance, MetricKind, MetricValue};
pub use logging::init_tracing;
pub use matcher::LabelConstraints;
pub use probe::{get_metric_labels, get_metric_value, MetricsProbe};
