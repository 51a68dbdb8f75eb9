// Request metrics
//
// Counters and the end-to-end latency histogram exposed on /metrics.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Upper bounds in seconds; the last bucket is +Inf.
pub const LATENCY_BUCKETS: [f64; 7] = [0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
pub struct Histogram {
    buckets: [AtomicU64; LATENCY_BUCKETS.len() + 1],
    count: AtomicU64,
    sum_micros: AtomicU64,
}

impl Histogram {
    pub fn observe(&self, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        let idx = LATENCY_BUCKETS
            .iter()
            .position(|b| secs <= *b)
            .unwrap_or(LATENCY_BUCKETS.len());
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_micros
            .fetch_add(elapsed.as_micros().min(u64::MAX as u128) as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let mut cumulative = 0;
        let buckets = self
            .buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                cumulative += b.load(Ordering::Relaxed);
                let le = LATENCY_BUCKETS
                    .get(i)
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "+Inf".to_string());
                (le, cumulative)
            })
            .collect();
        HistogramSnapshot {
            buckets,
            count: self.count.load(Ordering::Relaxed),
            sum: self.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramSnapshot {
    /// Cumulative counts keyed by upper bound.
    pub buckets: Vec<(String, u64)>,
    pub count: u64,
    pub sum: f64,
}

#[derive(Debug, Default)]
pub struct Metrics {
    pub analysis_requests_total: Counter,
    pub analysis_errors_total: Counter,
    pub claims_analyzed_total: Counter,
    pub cache_hits_total: Counter,
    pub analysis_duration_seconds: Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub analysis_requests_total: u64,
    pub analysis_errors_total: u64,
    pub claims_analyzed_total: u64,
    pub cache_hits_total: u64,
    pub analysis_duration_seconds: HistogramSnapshot,
}

impl Metrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analysis_requests_total: self.analysis_requests_total.get(),
            analysis_errors_total: self.analysis_errors_total.get(),
            claims_analyzed_total: self.claims_analyzed_total.get(),
            cache_hits_total: self.cache_hits_total.get(),
            analysis_duration_seconds: self.analysis_duration_seconds.snapshot(),
        }
    }
}
