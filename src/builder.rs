use crate::config::Config;
use crate::consumer::Consumer;
use crate::mpsc::Producer as MpscProducer;
use crate::ring::Ring;
use crate::sink::{DropSink, SilentSink};
use crate::spsc::Producer as SpscProducer;
use std::sync::Arc;

/// Assembles a diode from its construction options.
///
/// The variant selectors consume the builder and hand back the producer
/// and consumer halves:
///
/// ```
/// use diode_rs::{AlertFn, Builder, Config};
/// use std::sync::Arc;
///
/// let (tx, mut rx) = Builder::<u64>::new(Config::new(64))
///     .drop_sink(AlertFn(|missed| eprintln!("dropped {missed}")))
///     .multi_producer();
///
/// tx.publish(Arc::new(1));
/// assert_eq!(*rx.try_next().unwrap(), 1);
/// ```
pub struct Builder<T> {
    config: Config,
    sink: Arc<dyn DropSink>,
    clone_payload: Option<fn(&T) -> T>,
}

impl<T> Builder<T> {
    /// Starts a builder with the silent sink and no payload copying.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sink: Arc::new(SilentSink),
            clone_payload: None,
        }
    }

    /// Installs a drop sink receiving alerts (miss counts) and warnings
    /// (producer contention notices).
    pub fn drop_sink(mut self, sink: impl DropSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Makes `publish` store a private clone of the payload, so the caller
    /// may keep and reuse its own handle freely.
    pub fn copy_on_publish(mut self) -> Self
    where
        T: Clone,
    {
        self.clone_payload = Some(T::clone);
        self
    }

    /// Builds the single-producer variant.
    pub fn single_producer(self) -> (SpscProducer<T>, Consumer<T>) {
        let ring = Arc::new(Ring::new(self.config, self.sink, self.clone_payload));
        (SpscProducer::new(Arc::clone(&ring)), Consumer::new(ring))
    }

    /// Builds the many-producer variant.
    pub fn multi_producer(self) -> (MpscProducer<T>, Consumer<T>) {
        let ring = Arc::new(Ring::new(self.config, self.sink, self.clone_payload));
        (MpscProducer::new(Arc::clone(&ring)), Consumer::new(ring))
    }
}

/// Single-producer diode with the given capacity and default options.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn spsc<T>(capacity: usize) -> (SpscProducer<T>, Consumer<T>) {
    Builder::new(Config::new(capacity)).single_producer()
}

/// Many-producer diode with the given capacity and default options.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn mpsc<T>(capacity: usize) -> (MpscProducer<T>, Consumer<T>) {
    Builder::new(Config::new(capacity)).multi_producer()
}
