//! In-process metrics collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }
}

/// Collected metrics for the comment engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Query metrics
    pub list_requests: Counter,
    pub recent_requests: Counter,
    pub count_requests: Counter,
    pub comments_returned: Counter,

    // Submission metrics
    pub submissions_received: Counter,
    pub submissions_rejected: Counter,
    pub submissions_rate_limited: Counter,
    pub comments_accepted: Counter,
    pub comments_waiting: Counter,
    pub comments_spam: Counter,

    // Notification metrics
    pub notifications_sent: Counter,
    pub notification_failures: Counter,
    pub notification_timeouts: Counter,

    // Latency histograms
    pub list_latency_ms: Histogram,
    pub submit_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            list_requests: self.list_requests.get(),
            recent_requests: self.recent_requests.get(),
            count_requests: self.count_requests.get(),
            comments_returned: self.comments_returned.get(),
            submissions_received: self.submissions_received.get(),
            submissions_rejected: self.submissions_rejected.get(),
            submissions_rate_limited: self.submissions_rate_limited.get(),
            comments_accepted: self.comments_accepted.get(),
            comments_waiting: self.comments_waiting.get(),
            comments_spam: self.comments_spam.get(),
            notifications_sent: self.notifications_sent.get(),
            notification_failures: self.notification_failures.get(),
            list_latency_mean_ms: self.list_latency_ms.mean(),
            submit_latency_mean_ms: self.submit_latency_ms.mean(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub list_requests: u64,
    pub recent_requests: u64,
    pub count_requests: u64,
    pub comments_returned: u64,
    pub submissions_received: u64,
    pub submissions_rejected: u64,
    pub submissions_rate_limited: u64,
    pub comments_accepted: u64,
    pub comments_waiting: u64,
    pub comments_spam: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
    pub list_latency_mean_ms: f64,
    pub submit_latency_mean_ms: f64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
