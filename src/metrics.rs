use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for monitoring diode behavior.
///
/// Uses atomic counters with `Relaxed` ordering since these are purely
/// statistical - no control flow depends on exact values, and eventual
/// visibility is acceptable for observability.
#[derive(Debug, Default)]
pub struct Metrics {
    published: AtomicU64,
    consumed: AtomicU64,
    dropped: AtomicU64,
    alerts: AtomicU64,
    collisions: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the published-values counter.
    #[inline]
    pub fn add_published(&self, n: u64) {
        self.published.fetch_add(n, Ordering::Relaxed);
    }

    /// Increment the consumed-values counter.
    #[inline]
    pub fn add_consumed(&self, n: u64) {
        self.consumed.fetch_add(n, Ordering::Relaxed);
    }

    /// Add to the total of overwritten (dropped) sequences.
    #[inline]
    pub fn add_dropped(&self, n: u64) {
        self.dropped.fetch_add(n, Ordering::Relaxed);
    }

    /// Increment the alert-invocation counter.
    #[inline]
    pub fn add_alerts(&self, n: u64) {
        self.alerts.fetch_add(n, Ordering::Relaxed);
    }

    /// Increment the publish-collision counter.
    #[inline]
    pub fn add_collisions(&self, n: u64) {
        self.collisions.fetch_add(n, Ordering::Relaxed);
    }

    /// Take a snapshot of the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            alerts: self.alerts.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of counter values.
///
/// Plain data (`Copy`) for easy aggregation and display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Values published (both variants; every publish eventually succeeds).
    pub published: u64,
    /// Values handed to the consumer.
    pub consumed: u64,
    /// Sum of the miss counts reported through the drop sink.
    pub dropped: u64,
    /// Number of alert invocations.
    pub alerts: u64,
    /// Publish retries caused by slot contention (many-producer only).
    pub collisions: u64,
}
