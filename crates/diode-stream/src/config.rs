//! Configuration for stream behavior.

use std::time::Duration;

/// Configuration for the async adapters.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Poll interval for the hybrid wakeup strategy.
    ///
    /// Even with the publish-driven notify, this interval acts as a safety
    /// net: it catches publishes made through an unwrapped producer and
    /// notifications that fall between two polls.
    ///
    /// Default: 10ms
    pub poll_interval: Duration,

    /// Maximum values drained from the diode per poll.
    ///
    /// Larger batches amortize wakeups; smaller batches bound the latency
    /// of the first value in a burst.
    ///
    /// Default: 64
    pub batch_hint: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            batch_hint: 64,
        }
    }
}

impl StreamConfig {
    /// Low-latency preset: short poll interval, small batches.
    pub fn low_latency() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
            batch_hint: 16,
        }
    }

    /// High-throughput preset: long poll interval, large batches.
    pub fn high_throughput() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            batch_hint: 256,
        }
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the batch hint.
    pub fn with_batch_hint(mut self, hint: usize) -> Self {
        self.batch_hint = hint;
        self
    }
}
