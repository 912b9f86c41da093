//! Basic metrics instrumentation for tracking performance.
//!
//! Provides counters and duration tracking for HTTP requests and record
//! fetches. All counters are process-local atomics; nothing is exported.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector for tracking API performance.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of HTTP errors
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all HTTP requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Number of records fetched across all entity types
    records_fetched_total: Arc<AtomicU64>,

    /// Number of record mutations issued
    records_mutated_total: Arc<AtomicU64>,
}

/// Point-in-time snapshot of all counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_total_ms: u64,
    pub records_fetched_total: u64,
    pub records_mutated_total: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            records_fetched_total: Arc::new(AtomicU64::new(0)),
            records_mutated_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record records fetched from the store.
    pub fn record_records_fetched(&self, count: usize) {
        self.records_fetched_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a record mutation (create or update).
    pub fn record_mutation(&self) {
        self.records_mutated_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total HTTP requests.
    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP errors.
    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Snapshot all counters.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total.load(Ordering::Relaxed),
            http_errors_total: self.http_errors_total.load(Ordering::Relaxed),
            http_duration_total_ms: self.http_duration_total_ms.load(Ordering::Relaxed),
            records_fetched_total: self.records_fetched_total.load(Ordering::Relaxed),
            records_mutated_total: self.records_mutated_total.load(Ordering::Relaxed),
        }
    }
}
