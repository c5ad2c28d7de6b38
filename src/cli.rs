use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "metrics-probe", version, about = "Inspect a Prometheus metrics endpoint")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bearer token (overrides the configuration)
    #[arg(long, env = "METRICS_PROBE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// URL scheme: http or https
    #[arg(long, global = true)]
    pub scheme: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the value of one metric instance
    Value {
        /// Host and port of the endpoint, e.g. localhost:9090
        endpoint: String,

        /// Metric family name
        family: String,

        /// Label constraints as alternating name and value
        labels: Vec<String>,
    },

    /// Print the labels of every instance of a family
    Labels {
        /// Host and port of the endpoint
        endpoint: String,

        /// Metric family name
        family: String,

        /// Print a JSON array instead of one line per instance
        #[arg(long)]
        json: bool,
    },

    /// List the families exposed by an endpoint
    Families {
        /// Host and port of the endpoint
        endpoint: String,
    },
}
