//! Command-line and environment configuration.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use thiserror::Error;

use crate::pipeline::{PipelineConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_RECV_BUFFER, DEFAULT_WORKERS};
use crate::record::RecordEncoding;
use crate::telemetry::HEADER_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Emit records as log events.
    Log,
    /// Append records to a JSON-lines file.
    Jsonl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("receive buffer of {0} bytes is smaller than the packet header")]
    RecvBufferTooSmall(usize),

    #[error("the jsonl sink needs --encoding json")]
    BinaryLines,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "f1-telemetry-ingest",
    version,
    about = "Ingest F1 2020 UDP telemetry into a record sink"
)]
pub struct Config {
    /// UDP address to listen on
    #[arg(long, env = "F1_INGEST_BIND", default_value = "0.0.0.0:20777")]
    pub bind: SocketAddr,

    /// Datagrams buffered between the receiver and the workers
    #[arg(long, env = "F1_INGEST_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Concurrent workers draining the queue
    #[arg(long, env = "F1_INGEST_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Size of the reusable receive buffer in bytes
    #[arg(long, env = "F1_INGEST_RECV_BUFFER", default_value_t = DEFAULT_RECV_BUFFER)]
    pub recv_buffer: usize,

    #[arg(long, env = "F1_INGEST_SINK", value_enum, default_value_t = SinkKind::Log)]
    pub sink: SinkKind,

    /// Output file for the jsonl sink
    #[arg(long, env = "F1_INGEST_OUTPUT", default_value = "telemetry.jsonl")]
    pub output: PathBuf,

    #[arg(long, env = "F1_INGEST_ENCODING", value_enum, default_value_t = RecordEncoding::Json)]
    pub encoding: RecordEncoding,

    /// Serve /health and /stats on this address
    #[arg(long, env = "F1_INGEST_STATS_ADDR")]
    pub stats_addr: Option<SocketAddr>,

    /// Seconds between metrics summaries, 0 disables them
    #[arg(long, env = "F1_INGEST_METRICS_INTERVAL", default_value_t = 10)]
    pub metrics_interval_secs: u64,

    /// Stop after this many seconds without a datagram, 0 waits forever
    #[arg(long, env = "F1_INGEST_IDLE_TIMEOUT", default_value_t = 0)]
    pub idle_timeout_secs: u64,

    /// Warn in the summary when p99 processing latency exceeds this many
    /// milliseconds
    #[arg(long, env = "F1_INGEST_LATENCY_BUDGET_MS")]
    pub latency_budget_ms: Option<u64>,

    #[arg(long, env = "F1_INGEST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Zero("queue capacity"));
        }
        if self.workers == 0 {
            return Err(ConfigError::Zero("worker count"));
        }
        if self.recv_buffer < HEADER_SIZE {
            return Err(ConfigError::RecvBufferTooSmall(self.recv_buffer));
        }
        if self.sink == SinkKind::Jsonl && self.encoding != RecordEncoding::Json {
            return Err(ConfigError::BinaryLines);
        }
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            queue_capacity: self.queue_capacity,
            workers: self.workers,
            encoding: self.encoding,
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    pub fn latency_budget(&self) -> Option<Duration> {
        self.latency_budget_ms.map(Duration::from_millis)
    }

    pub fn metrics_interval(&self) -> Option<Duration> {
        (self.metrics_interval_secs > 0).then(|| Duration::from_secs(self.metrics_interval_secs))
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("f1-telemetry-ingest").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.bind, "0.0.0.0:20777".parse().unwrap());
        assert_eq!(config.queue_capacity, 10_000);
        assert_eq!(config.workers, 100);
        assert_eq!(config.recv_buffer, 2048);
        assert_eq!(config.sink, SinkKind::Log);
        assert_eq!(config.encoding, RecordEncoding::Json);
        assert_eq!(config.idle_timeout(), None);
        assert_eq!(config.latency_budget(), None);
        assert_eq!(config.metrics_interval(), Some(Duration::from_secs(10)));
        assert_eq!(config.default_log_filter(), "info");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--bind",
            "127.0.0.1:30777",
            "--workers",
            "8",
            "--encoding",
            "msgpack",
            "--stats-addr",
            "127.0.0.1:9090",
            "--idle-timeout-secs",
            "5",
            "--latency-budget-ms",
            "25",
            "-vv",
        ]);
        assert_eq!(config.bind.port(), 30777);
        assert_eq!(config.pipeline_config().workers, 8);
        assert_eq!(config.encoding, RecordEncoding::MessagePack);
        assert!(config.stats_addr.is_some());
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.latency_budget(), Some(Duration::from_millis(25)));
        assert_eq!(config.default_log_filter(), "trace");
    }

    #[test]
    fn rejects_unusable_settings() {
        assert_eq!(
            parse(&["--workers", "0"]).validate(),
            Err(ConfigError::Zero("worker count"))
        );
        assert_eq!(
            parse(&["--recv-buffer", "16"]).validate(),
            Err(ConfigError::RecvBufferTooSmall(16))
        );
        assert_eq!(
            parse(&["--sink", "jsonl", "--encoding", "msgpack"]).validate(),
            Err(ConfigError::BinaryLines)
        );
    }
}
