use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use super::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONCURRENCY, DEFAULT_NUM_LOGS,
    DEFAULT_QUERY_REQUESTS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_URL,
};
use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::{OutputFormat, PositiveUsize};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Insert randomly generated log entries
    Insert(InsertArgs),
    /// Query all stored logs
    Query(QueryArgs),
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "insert",
            Command::Query(_) => "query",
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct InsertArgs {
    /// Number of log entries to insert
    #[arg(long = "num-logs", short = 'n', default_value = DEFAULT_NUM_LOGS, value_parser = parse_positive_usize)]
    pub num_logs: PositiveUsize,

    /// Requests handed to the runner per batch; batches run one after another
    #[arg(long = "batch-size", short = 'b', default_value = DEFAULT_BATCH_SIZE, value_parser = parse_positive_usize)]
    pub batch_size: PositiveUsize,
}

#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// Number of query_all requests to send
    #[arg(long = "requests", short = 'r', default_value = DEFAULT_QUERY_REQUESTS, value_parser = parse_positive_usize)]
    pub requests: PositiveUsize,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async load generator for JSON log servers - bounded-concurrency insert and query runs with latency percentiles and throughput reports."
)]
pub struct TesterArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Log server endpoint that receives the JSON POST requests
    #[arg(long, short, global = true, default_value = DEFAULT_URL, env = "LOGSTRESS_URL")]
    pub url: String,

    /// Maximum number of requests in flight at once
    #[arg(long = "max-concurrency", short = 'm', global = true, default_value = DEFAULT_MAX_CONCURRENCY, value_parser = parse_positive_usize)]
    pub max_concurrency: PositiveUsize,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", global = true, default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", global = true, default_value = DEFAULT_CONNECT_TIMEOUT, value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Deadline for the whole run; requests still pending afterwards fail with a timeout
    #[arg(long = "deadline", global = true, value_parser = parse_duration_arg)]
    pub deadline: Option<Duration>,

    /// Report format
    #[arg(long = "output-format", global = true, value_enum, default_value_t = OutputFormat::Text, ignore_case = true)]
    pub output_format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long = "output", short = 'o', global = true)]
    pub output: Option<String>,

    /// Path to a TOML or JSON config file
    #[arg(long = "config", short = 'c', global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}
