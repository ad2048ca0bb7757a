//! Pipeline counters and processing latency
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::telemetry::PacketId;

const LATENCY_WINDOW: usize = 1000;

pub type SharedMetrics = Arc<RwLock<Metrics>>;

#[derive(Debug)]
pub struct Metrics {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    pub ignored: u64,
    pub unknown: u64,
    pub decode_errors: u64,
    pub stored: u64,
    pub store_errors: u64,
    pub stored_by_type: BTreeMap<PacketId, u64>,

    // processing latency in microseconds
    latencies: VecDeque<u64>,
    max_samples: usize,
    latency_budget: Option<Duration>,

    pub start_time: Instant,
}

/// Latency summary in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencyStats {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p99_ms: f64,
}

/// Point-in-time copy of the counters, as served by the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    pub ignored: u64,
    pub unknown: u64,
    pub decode_errors: u64,
    pub stored: u64,
    pub store_errors: u64,
    pub stored_by_type: BTreeMap<PacketId, u64>,
    pub throughput_dps: f64,
    pub failure_rate_pct: f64,
    pub latency: LatencyStats,
    pub uptime_secs: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            datagrams_received: 0,
            bytes_received: 0,
            ignored: 0,
            unknown: 0,
            decode_errors: 0,
            stored: 0,
            store_errors: 0,
            stored_by_type: BTreeMap::new(),
            latencies: VecDeque::with_capacity(LATENCY_WINDOW),
            max_samples: LATENCY_WINDOW,
            latency_budget: None,
            start_time: Instant::now(),
        }
    }

    pub fn shared() -> SharedMetrics {
        Self::new().into_shared()
    }

    pub fn into_shared(self) -> SharedMetrics {
        Arc::new(RwLock::new(self))
    }

    /// p99 latency above `budget` is reported as a warning by
    /// [`log_summary`](Self::log_summary). No budget, no warning.
    pub fn with_latency_budget(mut self, budget: Option<Duration>) -> Self {
        self.latency_budget = budget;
        self
    }

    /// The budget, if one is set and the current p99 exceeds it.
    pub fn latency_budget_exceeded(&self) -> Option<Duration> {
        let budget = self.latency_budget?;
        (self.latency_stats().p99_ms > budget.as_secs_f64() * 1000.0).then_some(budget)
    }

    pub fn record_received(&mut self, len: usize) {
        self.datagrams_received += 1;
        self.bytes_received += len as u64;
    }

    pub fn record_stored(&mut self, packet: PacketId) {
        self.stored += 1;
        *self.stored_by_type.entry(packet).or_default() += 1;
    }

    pub fn add_latency(&mut self, latency: Duration) {
        if self.latencies.len() >= self.max_samples {
            self.latencies.pop_front();
        }
        self.latencies
            .push_back(u64::try_from(latency.as_micros()).unwrap_or(u64::MAX));
    }

    pub fn latency_stats(&self) -> LatencyStats {
        let mut data: Vec<u64> = self.latencies.iter().copied().collect();
        if data.is_empty() {
            return LatencyStats::default();
        }
        data.sort_unstable();

        let sum: u64 = data.iter().sum();
        let mean = sum as f64 / data.len() as f64;

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) as f64 / 2.0
        } else {
            data[mid] as f64
        };

        let p99_index = ((data.len() as f64 * 0.99) as usize).min(data.len() - 1);
        let p99 = data[p99_index] as f64;

        LatencyStats {
            mean_ms: mean / 1000.0,
            median_ms: median / 1000.0,
            p99_ms: p99 / 1000.0,
        }
    }

    pub fn throughput_dps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.datagrams_received as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Share of received datagrams that were unknown, undecodable or not
    /// stored, in percent. Ignored datagrams are not failures.
    pub fn failure_rate(&self) -> f64 {
        if self.datagrams_received == 0 {
            return 0.0;
        }
        let failed = self.unknown + self.decode_errors + self.store_errors;
        failed as f64 / self.datagrams_received as f64 * 100.0
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            datagrams_received: self.datagrams_received,
            bytes_received: self.bytes_received,
            ignored: self.ignored,
            unknown: self.unknown,
            decode_errors: self.decode_errors,
            stored: self.stored,
            store_errors: self.store_errors,
            stored_by_type: self.stored_by_type.clone(),
            throughput_dps: self.throughput_dps(),
            failure_rate_pct: self.failure_rate(),
            latency: self.latency_stats(),
            uptime_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    pub fn log_summary(&self) {
        let latency = self.latency_stats();
        info!(
            received = self.datagrams_received,
            bytes = self.bytes_received,
            stored = self.stored,
            ignored = self.ignored,
            unknown = self.unknown,
            decode_errors = self.decode_errors,
            store_errors = self.store_errors,
            throughput_dps = format_args!("{:.0}", self.throughput_dps()),
            mean_ms = format_args!("{:.3}", latency.mean_ms),
            median_ms = format_args!("{:.3}", latency.median_ms),
            p99_ms = format_args!("{:.3}", latency.p99_ms),
            runtime_secs = format_args!("{:.1}", self.start_time.elapsed().as_secs_f64()),
            "pipeline summary"
        );

        if let Some(budget) = self.latency_budget_exceeded() {
            warn!(
                p99_ms = latency.p99_ms,
                budget_ms = budget.as_secs_f64() * 1000.0,
                "p99 processing latency over budget"
            );
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
