//! Wall-time histogram for polling cycles. A cycle's duration grows with the
//! number of odds requests made during a refresh, so the tail is worth watching.

use std::time::Duration;

use hdrhistogram::Histogram;

/// Values stored in milliseconds.
pub struct CycleLatency {
    inner: Histogram<u64>,
}

impl CycleLatency {
    /// Tracks 1ms to 1h, 3 significant figures.
    pub fn new() -> Self {
        let inner = Histogram::new_with_bounds(1, 3_600_000, 3).expect("valid histogram bounds");
        Self { inner }
    }

    pub fn record(&mut self, d: Duration) {
        let ms = d.as_millis().clamp(1, 3_600_000) as u64;
        let _ = self.inner.record(ms);
    }

    /// Return (p50_ms, p95_ms, p99_ms). None if no samples.
    pub fn percentiles(&self) -> Option<(u64, u64, u64)> {
        if self.inner.len() == 0 {
            return None;
        }
        Some((
            self.inner.value_at_quantile(0.5),
            self.inner.value_at_quantile(0.95),
            self.inner.value_at_quantile(0.99),
        ))
    }

    pub fn len(&self) -> u64 {
        self.inner.len()
    }
}

impl Default for CycleLatency {
    fn default() -> Self {
        Self::new()
    }
}
