use tracing::warn;

/// Receives loss and contention notifications from a diode.
///
/// `alert` is invoked synchronously from the consumer's `try_next` when a
/// fast-forward skips overwritten values. `warn` is invoked synchronously
/// from a publishing thread when the many-producer variant hits slot
/// contention. Neither call may block: hand expensive work off to your own
/// thread or queue.
pub trait DropSink: Send + Sync {
    /// `missed` values were overwritten since the last successful read.
    fn alert(&self, missed: u64);

    /// A producer hit contention and is retrying. Defaults to a no-op.
    fn warn(&self, reason: &str) {
        let _ = reason;
    }
}

/// Adapter to let an ordinary closure serve as an alert-only sink.
///
/// ```
/// use diode_rs::AlertFn;
///
/// let sink = AlertFn(|missed: u64| eprintln!("dropped {missed} values"));
/// ```
pub struct AlertFn<F>(pub F);

impl<F> DropSink for AlertFn<F>
where
    F: Fn(u64) + Send + Sync,
{
    fn alert(&self, missed: u64) {
        (self.0)(missed);
    }
}

/// The default sink: swallows alerts and warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DropSink for SilentSink {
    fn alert(&self, _missed: u64) {}
}

/// Forwards alerts and warnings to the `tracing` logger at `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DropSink for TracingSink {
    fn alert(&self, missed: u64) {
        warn!(missed, "diode dropped values");
    }

    fn warn(&self, reason: &str) {
        warn!(reason, "diode producer contention");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_alert_fn_receives_alerts() {
        let total = Arc::new(AtomicU64::new(0));
        let captured = Arc::clone(&total);
        let sink = AlertFn(move |missed: u64| {
            captured.fetch_add(missed, Ordering::Relaxed);
        });

        sink.alert(3);
        sink.alert(4);
        sink.warn("ignored by default");
        assert_eq!(total.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn test_silent_sink_is_a_no_op() {
        SilentSink.alert(10);
        SilentSink.warn("nothing happens");
    }
}
