/// Configuration shared by both diode variants.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of slots in the ring. Also the overwrite window: a value is
    /// safe from being clobbered for exactly one lap of the ring.
    pub capacity: usize,
    /// Enable counter collection (slight overhead on the hot paths).
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a configuration with the given capacity and metrics disabled.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. A zero-slot ring has no slot to publish
    /// into, so this is rejected at construction rather than at first use.
    pub const fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "diode capacity must be at least 1");
        Self {
            capacity,
            enable_metrics: false,
        }
    }

    /// Enables counter collection.
    pub const fn with_metrics(mut self) -> Self {
        self.enable_metrics = true;
        self
    }

    /// Returns the ring capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1024,
            enable_metrics: false,
        }
    }
}
